mod common;

use anyhow::Result;
use bancus::application::LedgerError;
use chrono::Utc;
use common::{test_service, transfer_cause, StandardAccounts};

#[test]
fn test_deposit_increases_balance() -> Result<()> {
    let mut service = test_service();
    StandardAccounts::create_pair(&mut service)?;

    service.deposit("001", 20000)?;

    // 1000.00 + 200.00 = 1200.00
    assert_eq!(service.get_balance("001")?, 120000);
    Ok(())
}

#[test]
fn test_deposit_rejects_zero_and_negative_amounts() -> Result<()> {
    let mut service = test_service();
    StandardAccounts::create_pair(&mut service)?;

    for amount in [0, -5000] {
        let err = service.deposit("001", amount).unwrap_err();
        assert!(matches!(
            err,
            LedgerError::InvalidAmount {
                operation: "deposit",
                ..
            }
        ));
    }

    // The rejected deposits left the balance alone
    assert_eq!(service.get_balance("001")?, 100000);
    Ok(())
}

#[test]
fn test_deposit_checks_amount_before_existence() {
    let mut service = test_service();

    // A bad amount on a missing account reports the amount, not the account
    let err = service.deposit("999", -500).unwrap_err();
    assert!(matches!(
        err,
        LedgerError::InvalidAmount {
            operation: "deposit",
            amount: -500,
        }
    ));
}

#[test]
fn test_deposit_missing_account() {
    let mut service = test_service();

    let err = service.deposit("999", 10000).unwrap_err();
    assert!(matches!(err, LedgerError::AccountNotFound(n) if n == "999"));
}

#[test]
fn test_deposit_into_inactive_account_succeeds() -> Result<()> {
    let mut service = test_service();
    service.create_account("004", "Diego Nunes", 100000)?;
    service.deactivate_account("004")?;

    // Deactivation blocks withdrawals, never deposits
    service.deposit("004", 10000)?;

    assert_eq!(service.get_balance("004")?, 110000);
    Ok(())
}

#[test]
fn test_withdraw_decreases_balance() -> Result<()> {
    let mut service = test_service();
    StandardAccounts::create_pair(&mut service)?;

    service.withdraw("001", 15000)?;

    // 1000.00 - 150.00 = 850.00
    assert_eq!(service.get_balance("001")?, 85000);
    Ok(())
}

#[test]
fn test_withdraw_whole_balance_reaches_zero() -> Result<()> {
    let mut service = test_service();
    StandardAccounts::create_pair(&mut service)?;

    service.withdraw("002", 50000)?;

    assert_eq!(service.get_balance("002")?, 0);
    Ok(())
}

#[test]
fn test_withdraw_rejects_zero_and_negative_amounts() -> Result<()> {
    let mut service = test_service();
    StandardAccounts::create_pair(&mut service)?;

    for amount in [0, -10000] {
        let err = service.withdraw("001", amount).unwrap_err();
        assert!(matches!(
            err,
            LedgerError::InvalidAmount {
                operation: "withdraw",
                ..
            }
        ));
    }

    assert_eq!(service.get_balance("001")?, 100000);
    Ok(())
}

#[test]
fn test_withdraw_checks_amount_before_existence() {
    let mut service = test_service();

    // A bad amount on a missing account reports the amount, not the account
    let err = service.withdraw("999", 0).unwrap_err();
    assert!(matches!(
        err,
        LedgerError::InvalidAmount {
            operation: "withdraw",
            amount: 0,
        }
    ));
}

#[test]
fn test_withdraw_missing_account() {
    let mut service = test_service();

    let err = service.withdraw("999", 10000).unwrap_err();
    assert!(matches!(err, LedgerError::AccountNotFound(n) if n == "999"));
}

#[test]
fn test_withdraw_insufficient_funds() -> Result<()> {
    let mut service = test_service();
    service.create_account("007", "Rafael Lopes", 10000)?;

    let err = service.withdraw("007", 50000).unwrap_err();
    match &err {
        LedgerError::InsufficientFunds {
            number,
            balance,
            requested,
        } => {
            assert_eq!(number, "007");
            assert_eq!(*balance, 10000);
            assert_eq!(*requested, 50000);
        }
        other => panic!("Expected InsufficientFunds, got: {other:?}"),
    }

    // The message renders both amounts with two decimals
    assert!(err.to_string().contains("100.00"), "{}", err);
    assert!(err.to_string().contains("500.00"), "{}", err);

    // The failed withdrawal did not touch the balance
    assert_eq!(service.get_balance("007")?, 10000);
    Ok(())
}

#[test]
fn test_withdraw_from_inactive_account() -> Result<()> {
    let mut service = test_service();
    StandardAccounts::create_with_inactive(&mut service)?;

    // 003 holds 1000.00, plenty to cover: the status check comes first
    let err = service.withdraw("003", 10000).unwrap_err();
    match err {
        LedgerError::AccountInactive { number, since } => {
            assert_eq!(number, "003");
            assert_eq!(since, Utc::now().date_naive());
        }
        other => panic!("Expected AccountInactive, got: {other:?}"),
    }

    assert_eq!(service.get_balance("003")?, 100000);
    Ok(())
}

#[test]
fn test_transfer_moves_money_between_accounts() -> Result<()> {
    let mut service = test_service();
    StandardAccounts::create_pair(&mut service)?;

    let total_before = service.get_balance("001")? + service.get_balance("002")?;
    service.transfer("001", "002", 30000)?;

    // 1000.00 - 300.00 = 700.00, 500.00 + 300.00 = 800.00
    assert_eq!(service.get_balance("001")?, 70000);
    assert_eq!(service.get_balance("002")?, 80000);

    // The move conserves the combined total
    assert_eq!(
        service.get_balance("001")? + service.get_balance("002")?,
        total_before
    );
    Ok(())
}

#[test]
fn test_transfer_failure_names_endpoints_and_amount() -> Result<()> {
    let mut service = test_service();
    StandardAccounts::create_pair(&mut service)?;

    let err = service.transfer("001", "002", 999999).unwrap_err();
    match &err {
        LedgerError::TransferFailed {
            from,
            to,
            amount,
            cause,
        } => {
            assert_eq!(from, "001");
            assert_eq!(to, "002");
            assert_eq!(*amount, 999999);
            assert!(matches!(
                cause.as_ref(),
                LedgerError::InsufficientFunds { .. }
            ));
        }
        other => panic!("Expected TransferFailed, got: {other:?}"),
    }

    assert_eq!(
        err.to_string(),
        "Transfer of 9999.99 from account 001 to 002 failed"
    );
    Ok(())
}

#[test]
fn test_transfer_wraps_invalid_amount() -> Result<()> {
    let mut service = test_service();
    StandardAccounts::create_pair(&mut service)?;

    let err = service.transfer("001", "002", 0).unwrap_err();
    assert!(matches!(
        transfer_cause(err),
        LedgerError::InvalidAmount {
            operation: "transfer",
            amount: 0,
        }
    ));

    assert_eq!(service.get_balance("001")?, 100000);
    assert_eq!(service.get_balance("002")?, 50000);
    Ok(())
}

#[test]
fn test_transfer_checks_amount_before_existence() {
    let mut service = test_service();

    // A bad amount with missing endpoints reports the amount, not an account
    let err = service.transfer("901", "902", -10000).unwrap_err();
    assert!(matches!(
        transfer_cause(err),
        LedgerError::InvalidAmount {
            operation: "transfer",
            amount: -10000,
        }
    ));
}

#[test]
fn test_transfer_reports_missing_source_before_destination() {
    let mut service = test_service();

    // Neither side exists; the source is the one reported
    let err = service.transfer("901", "902", 10000).unwrap_err();
    assert!(matches!(
        transfer_cause(err),
        LedgerError::AccountNotFound(n) if n == "901"
    ));
}

#[test]
fn test_transfer_wraps_missing_destination() -> Result<()> {
    let mut service = test_service();
    StandardAccounts::create_pair(&mut service)?;

    let err = service.transfer("001", "999", 10000).unwrap_err();
    assert!(matches!(
        transfer_cause(err),
        LedgerError::AccountNotFound(n) if n == "999"
    ));

    // The source keeps its money
    assert_eq!(service.get_balance("001")?, 100000);
    Ok(())
}

#[test]
fn test_transfer_wraps_inactive_source() -> Result<()> {
    let mut service = test_service();
    StandardAccounts::create_with_inactive(&mut service)?;

    let err = service.transfer("003", "001", 10000).unwrap_err();
    assert!(matches!(
        transfer_cause(err),
        LedgerError::AccountInactive { number, .. } if number == "003"
    ));

    // No partial movement on failure
    assert_eq!(service.get_balance("003")?, 100000);
    assert_eq!(service.get_balance("001")?, 100000);
    Ok(())
}

#[test]
fn test_transfer_wraps_insufficient_funds() -> Result<()> {
    let mut service = test_service();
    StandardAccounts::create_pair(&mut service)?;

    let err = service.transfer("002", "001", 60000).unwrap_err();
    match transfer_cause(err) {
        LedgerError::InsufficientFunds {
            number,
            balance,
            requested,
        } => {
            assert_eq!(number, "002");
            assert_eq!(balance, 50000);
            assert_eq!(requested, 60000);
        }
        other => panic!("Expected InsufficientFunds, got: {other:?}"),
    }

    // Both balances are exactly as they were
    assert_eq!(service.get_balance("001")?, 100000);
    assert_eq!(service.get_balance("002")?, 50000);
    Ok(())
}

#[test]
fn test_transfer_into_inactive_destination_succeeds() -> Result<()> {
    let mut service = test_service();
    StandardAccounts::create_with_inactive(&mut service)?;

    // The destination's status is never checked, same rule as deposits
    service.transfer("001", "003", 25000)?;

    assert_eq!(service.get_balance("001")?, 75000);
    assert_eq!(service.get_balance("003")?, 125000);
    Ok(())
}

#[test]
fn test_transfer_error_chain_reaches_the_cause() -> Result<()> {
    use std::error::Error;

    let mut service = test_service();
    StandardAccounts::create_pair(&mut service)?;

    let err = service.transfer("002", "001", 60000).unwrap_err();

    // The wrapped failure is reachable through the standard source() chain
    let cause = err.source().expect("TransferFailed must carry a source");
    assert!(cause.to_string().contains("Insufficient funds"), "{}", cause);
    Ok(())
}
