// Allow dead_code because these helpers are used across different test files
// which are compiled separately
#![allow(dead_code)]

use anyhow::Result;
use bancus::application::{LedgerError, LedgerService};

/// Helper to create a service with an empty ledger
pub fn test_service() -> LedgerService {
    LedgerService::new()
}

/// Helper to unwrap a TransferFailed error into the failure that caused it
pub fn transfer_cause(err: LedgerError) -> LedgerError {
    match err {
        LedgerError::TransferFailed { cause, .. } => *cause,
        other => panic!("Expected TransferFailed, got: {other:?}"),
    }
}

/// Test fixture: standard account setup
pub struct StandardAccounts;

impl StandardAccounts {
    /// Two active accounts: 001 (Alice, 1000.00) and 002 (Bruno, 500.00)
    pub fn create_pair(service: &mut LedgerService) -> Result<()> {
        service.create_account("001", "Alice Martins", 100000)?;
        service.create_account("002", "Bruno Costa", 50000)?;
        Ok(())
    }

    /// The standard pair plus 003 (Carla, 1000.00) already deactivated
    pub fn create_with_inactive(service: &mut LedgerService) -> Result<()> {
        Self::create_pair(service)?;
        service.create_account("003", "Carla Dias", 100000)?;
        service.deactivate_account("003")?;
        Ok(())
    }
}
