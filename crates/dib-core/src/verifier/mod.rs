//! Cross-checks that what the initiator emitted, the responder received, and the initiator
//! finally confirmed are all mutually consistent.

use crate::{
    adapters::{ConfirmationKind, InitiatorAdapter, ResponderAdapter, ResponseKind},
    error::VerifyError,
    register::TransferRegister,
};
use dib_types::{ReasonCode, Transfer};
use tracing::{info, warn};

/// Cross-checks `t` across both ledgers and deregisters it once a verdict is reached.
///
/// Returns without deregistering when the ack is still pending — the verifier simply runs again
/// next tick once `monitor_confirmations` reports it again.
pub async fn verify<I, R>(
    initiator: &I,
    responder: &R,
    register: &TransferRegister,
    t: &Transfer,
) -> Result<(), VerifyError>
where
    I: InitiatorAdapter,
    R: ResponderAdapter,
{
    let Some(ack) = responder.check_response(t.id()).await? else {
        // Ack not yet emitted: inconclusive this tick.
        return Ok(());
    };

    let data_matches = responder
        .get_interledger_receive_tx(t)
        .await?
        .is_some_and(|record| record.data == t.data());

    let ack_consistent = match ack {
        ResponseKind::Accepted => initiator
            .get_interledger_commit_tx(t)
            .await?
            .is_some_and(|record| record.function == ConfirmationKind::Commit),
        ResponseKind::Rejected => initiator
            .get_interledger_abort_tx(t)
            .await?
            .is_some_and(|record| record.function == ConfirmationKind::Abort),
    };

    if data_matches && ack_consistent {
        info!(target: "dib::verifier", transfer = %t.id(), "transfer verified, deregistering");
        register.deregister(t.id()).await;
        return Ok(());
    }

    let code = ReasonCode::invalid_transfer();
    warn!(
        target: "dib::verifier",
        transfer = %t.id(),
        data_matches,
        ack_consistent,
        "transfer failed verification, reporting invalid-transfer code to both adapters"
    );
    // Best-effort on both sides; neither failure should block the other or deregistration.
    if let Err(err) = initiator.report_error(t.initiator_id(), code).await {
        warn!(target: "dib::verifier", transfer = %t.id(), error = %err, "initiator.report_error failed");
    }
    if let Err(err) = responder.report_error(t.id(), code).await {
        warn!(target: "dib::verifier", transfer = %t.id(), error = %err, "responder.report_error failed");
    }
    register.deregister(t.id()).await;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::local::{LocalInitiator, LocalResponder};

    fn transfer(secret: &[u8], initiator_id: &str, data: Vec<u8>) -> (LocalInitiator, Transfer) {
        let initiator = LocalInitiator::new(secret.to_vec());
        let event = initiator.emit_event(initiator_id, data, 1_000);
        let t = initiator.process_event(&event);
        (initiator, t)
    }

    #[tokio::test]
    async fn matching_data_and_accepted_ack_verifies_clean() {
        let (initiator, t) = transfer(b"s", "7", vec![0xDE]);
        let responder = LocalResponder::new();
        responder.send_data(t.id(), t.data()).await.unwrap();
        initiator.commit_sending(t.initiator_id(), None).await.unwrap();

        let register = TransferRegister::new();
        register.register(t.clone()).await;

        verify(&initiator, &responder, &register, &t).await.unwrap();

        assert!(register.is_empty().await);
        assert!(initiator.reported_errors().is_empty());
        assert!(responder.reported_errors().is_empty());
    }

    #[tokio::test]
    async fn tampered_data_reports_invalid_transfer_to_both_sides() {
        let (initiator, t) = transfer(b"s", "7", vec![0xDE]);
        let responder = LocalResponder::new();
        // Responder "received" different data than the initiator actually emitted.
        responder.send_data(t.id(), b"not-the-real-payload").await.unwrap();
        initiator.commit_sending(t.initiator_id(), None).await.unwrap();

        let register = TransferRegister::new();
        register.register(t.clone()).await;

        verify(&initiator, &responder, &register, &t).await.unwrap();

        assert!(register.is_empty().await);
        assert_eq!(initiator.reported_errors().len(), 1);
        assert_eq!(responder.reported_errors().len(), 1);
        assert_eq!(initiator.reported_errors()[0].1, ReasonCode::invalid_transfer());
    }

    #[tokio::test]
    async fn pending_ack_is_inconclusive_and_does_not_deregister() {
        let (initiator, t) = transfer(b"s", "7", vec![0xDE]);
        let responder = LocalResponder::new();

        let register = TransferRegister::new();
        register.register(t.clone()).await;

        verify(&initiator, &responder, &register, &t).await.unwrap();

        assert!(!register.is_empty().await);
    }
}
