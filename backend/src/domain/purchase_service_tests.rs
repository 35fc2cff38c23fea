//! Tests for the purchase service.

use std::sync::Arc;

use chrono::{DateTime, Local, NaiveDate, TimeZone, Utc};
use rstest::{fixture, rstest};

use super::*;
use crate::domain::ports::{
    BackupPriceStore, DisabledGoldPriceSource, EmptyBackupPriceStore, GoldPriceSourceError,
    MockGoldPriceSource, MockTransactionRepository, MockUserRepository, NoOpFallbackMetrics,
};
use crate::domain::{
    ErrorCode, HoldingsTotals, PriceSnapshot, User, UserDraft, UserId, UserName,
};

struct FixtureClock(DateTime<Utc>);

impl Clock for FixtureClock {
    fn local(&self) -> DateTime<Local> {
        self.0.with_timezone(&Local)
    }

    fn utc(&self) -> DateTime<Utc> {
        self.0
    }
}

struct SinglePointBackup(f64);

impl BackupPriceStore for SinglePointBackup {
    fn all(&self) -> Vec<PriceSnapshot> {
        let date = NaiveDate::from_ymd_opt(2025, 8, 1).expect("valid date");
        vec![PriceSnapshot::try_new(date, self.0).expect("valid snapshot")]
    }
}

fn purchased_at() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2025, 8, 15, 9, 30, 0)
        .single()
        .expect("valid timestamp")
}

#[fixture]
fn buyer() -> UserDraft {
    UserDraft {
        name: UserName::new("Asha Rao").expect("valid name"),
        email: Email::new("asha@example.com").expect("valid email"),
    }
}

fn stored_user(draft: &UserDraft) -> User {
    User::new(UserId::random(), draft.name.clone(), draft.email.clone())
}

fn live_price(price: f64) -> GoldPriceService {
    let mut live = MockGoldPriceSource::new();
    live.expect_current_price().returning(move || Ok(price));
    GoldPriceService::new(
        Arc::new(live),
        Arc::new(EmptyBackupPriceStore),
        Arc::new(NoOpFallbackMetrics),
    )
}

fn service(
    users: MockUserRepository,
    transactions: MockTransactionRepository,
    prices: GoldPriceService,
) -> PurchaseService<MockUserRepository, MockTransactionRepository> {
    PurchaseService::new(
        Arc::new(users),
        Arc::new(transactions),
        prices,
        Arc::new(FixtureClock(purchased_at())),
    )
}

fn users_returning(draft: &UserDraft) -> MockUserRepository {
    let user = stored_user(draft);
    let mut users = MockUserRepository::new();
    users
        .expect_find_or_create()
        .times(1)
        .return_once(move |_| Ok(user));
    users
}

fn order(buyer: UserDraft, amount: PurchaseAmount, quoted: Option<f64>) -> PurchaseOrder {
    PurchaseOrder {
        buyer,
        amount,
        quoted_price_per_gram: quoted,
    }
}

#[rstest]
#[tokio::test]
async fn buy_by_grams_records_cost_at_live_price(buyer: UserDraft) {
    let users = users_returning(&buyer);
    let mut transactions = MockTransactionRepository::new();
    transactions
        .expect_insert()
        .withf(|tx| {
            tx.grams_purchased() == 1.5
                && tx.price_per_gram() == 6_500.0
                && tx.amount_inr() == 9_750.0
                && tx.price_source() == PriceSource::Live
                && tx.created_at() == purchased_at()
        })
        .times(1)
        .return_once(|_| Ok(()));
    transactions
        .expect_totals_for_user()
        .times(1)
        .return_once(|_| {
            Ok(HoldingsTotals {
                total_grams: 2.000_04,
                total_invested_inr: 13_000.26,
                transaction_count: 2,
                last_purchase_at: Some(purchased_at()),
            })
        });

    let receipt = service(users, transactions, live_price(6_500.0))
        .buy(order(buyer, PurchaseAmount::Grams(1.5), None))
        .await
        .expect("purchase succeeds");

    assert_eq!(receipt.transaction.amount_inr(), 9_750.0);
    assert_eq!(receipt.total_grams_owned, 2.0);
}

#[rstest]
#[tokio::test]
async fn buy_by_rupees_converts_at_quoted_price(buyer: UserDraft) {
    let users = users_returning(&buyer);
    let mut transactions = MockTransactionRepository::new();
    transactions.expect_insert().times(1).return_once(|_| Ok(()));
    transactions
        .expect_totals_for_user()
        .return_once(|_| Ok(HoldingsTotals::default()));
    let mut live = MockGoldPriceSource::new();
    live.expect_current_price().never();
    let prices = GoldPriceService::new(
        Arc::new(live),
        Arc::new(EmptyBackupPriceStore),
        Arc::new(NoOpFallbackMetrics),
    );

    let receipt = service(users, transactions, prices)
        .buy(order(buyer, PurchaseAmount::Rupees(1_000.0), Some(6_000.0)))
        .await
        .expect("purchase succeeds");

    assert_eq!(receipt.transaction.grams_purchased(), 0.1667);
    assert_eq!(receipt.transaction.price_source(), PriceSource::Quoted);
    assert_eq!(
        receipt.transaction.amount_inr(),
        0.1667 * 6_000.0,
    );
}

#[rstest]
#[tokio::test]
async fn buy_uses_backup_price_when_live_feed_is_down(buyer: UserDraft) {
    let users = users_returning(&buyer);
    let mut transactions = MockTransactionRepository::new();
    transactions
        .expect_insert()
        .withf(|tx| tx.price_source() == PriceSource::Backup && tx.price_per_gram() == 6_100.0)
        .times(1)
        .return_once(|_| Ok(()));
    transactions
        .expect_totals_for_user()
        .return_once(|_| Ok(HoldingsTotals::default()));
    let mut live = MockGoldPriceSource::new();
    live.expect_current_price()
        .return_once(|| Err(GoldPriceSourceError::transport("connection refused")));
    let prices = GoldPriceService::new(
        Arc::new(live),
        Arc::new(SinglePointBackup(6_100.0)),
        Arc::new(NoOpFallbackMetrics),
    );

    let receipt = service(users, transactions, prices)
        .buy(order(buyer, PurchaseAmount::Grams(1.0), None))
        .await
        .expect("purchase succeeds");

    assert_eq!(receipt.transaction.price_source(), PriceSource::Backup);
}

#[rstest]
#[tokio::test]
async fn buy_without_any_price_is_service_unavailable(buyer: UserDraft) {
    let mut users = MockUserRepository::new();
    users.expect_find_or_create().never();
    let prices = GoldPriceService::new(
        Arc::new(DisabledGoldPriceSource),
        Arc::new(EmptyBackupPriceStore),
        Arc::new(NoOpFallbackMetrics),
    );

    let error = service(users, MockTransactionRepository::new(), prices)
        .buy(order(buyer, PurchaseAmount::Grams(1.0), None))
        .await
        .expect_err("no price");

    assert_eq!(error.code(), ErrorCode::ServiceUnavailable);
}

#[rstest]
#[case::zero(0.0)]
#[case::negative(-5.0)]
#[case::nan(f64::NAN)]
#[tokio::test]
async fn buy_rejects_invalid_quoted_price(buyer: UserDraft, #[case] quoted: f64) {
    let mut users = MockUserRepository::new();
    users.expect_find_or_create().never();

    let error = service(users, MockTransactionRepository::new(), live_price(6_000.0))
        .buy(order(buyer, PurchaseAmount::Grams(1.0), Some(quoted)))
        .await
        .expect_err("invalid price");

    assert_eq!(error.code(), ErrorCode::InvalidRequest);
    let details = error.details().expect("details");
    assert_eq!(details["field"], "quotedPriceInrPerGram");
}

#[rstest]
#[tokio::test]
async fn buy_rejects_amount_that_rounds_to_zero_grams(buyer: UserDraft) {
    let mut users = MockUserRepository::new();
    users.expect_find_or_create().never();

    let error = service(users, MockTransactionRepository::new(), live_price(1_000_000.0))
        .buy(order(buyer, PurchaseAmount::Rupees(10.0), None))
        .await
        .expect_err("too small");

    assert_eq!(error.code(), ErrorCode::InvalidRequest);
    assert_eq!(error.details().expect("details")["field"], "amountInr");
}

#[rstest]
#[tokio::test]
async fn buy_rejects_grams_whose_cost_overflows(buyer: UserDraft) {
    let mut transactions = MockTransactionRepository::new();
    transactions.expect_insert().never();

    let error = service(users_returning(&buyer), transactions, live_price(6_000.0))
        .buy(order(buyer, PurchaseAmount::Grams(1e300), Some(1e10)))
        .await
        .expect_err("cost overflow");

    assert_eq!(error.code(), ErrorCode::InvalidRequest);
    let details = error.details().expect("details");
    assert_eq!(details["field"], "grams");
    assert_eq!(details["code"], "invalid_amount");
}

#[rstest]
#[case::connection(
    UserRepositoryError::connection("pool timed out"),
    ErrorCode::ServiceUnavailable
)]
#[case::query(UserRepositoryError::query("syntax error"), ErrorCode::InternalError)]
#[tokio::test]
async fn buy_maps_user_repository_errors(
    buyer: UserDraft,
    #[case] failure: UserRepositoryError,
    #[case] expected: ErrorCode,
) {
    let mut users = MockUserRepository::new();
    users
        .expect_find_or_create()
        .return_once(move |_| Err(failure));
    let mut transactions = MockTransactionRepository::new();
    transactions.expect_insert().never();

    let error = service(users, transactions, live_price(6_000.0))
        .buy(order(buyer, PurchaseAmount::Grams(1.0), None))
        .await
        .expect_err("repository failure");

    assert_eq!(error.code(), expected);
}

#[rstest]
#[tokio::test]
async fn buy_maps_insert_connection_error_to_service_unavailable(buyer: UserDraft) {
    let users = users_returning(&buyer);
    let mut transactions = MockTransactionRepository::new();
    transactions
        .expect_insert()
        .return_once(|_| Err(TransactionRepositoryError::connection("database offline")));
    transactions.expect_totals_for_user().never();

    let error = service(users, transactions, live_price(6_000.0))
        .buy(order(buyer, PurchaseAmount::Grams(1.0), None))
        .await
        .expect_err("insert failure");

    assert_eq!(error.code(), ErrorCode::ServiceUnavailable);
}

#[rstest]
#[tokio::test]
async fn holdings_for_unknown_email_is_not_found() {
    let mut users = MockUserRepository::new();
    users.expect_find_by_email().return_once(|_| Ok(None));
    let mut transactions = MockTransactionRepository::new();
    transactions.expect_totals_for_user().never();

    let email = Email::new("nobody@example.com").expect("valid email");
    let error = service(users, transactions, live_price(6_000.0))
        .holdings(&email)
        .await
        .expect_err("unknown user");

    assert_eq!(error.code(), ErrorCode::NotFound);
}

#[rstest]
#[tokio::test]
async fn holdings_returns_user_totals(buyer: UserDraft) {
    let user = stored_user(&buyer);
    let expected_id = user.id();
    let mut users = MockUserRepository::new();
    users
        .expect_find_by_email()
        .withf(|email| email.as_ref() == "asha@example.com")
        .return_once(move |_| Ok(Some(user)));
    let mut transactions = MockTransactionRepository::new();
    transactions
        .expect_totals_for_user()
        .withf(move |user_id| *user_id == expected_id)
        .return_once(|_| {
            Ok(HoldingsTotals {
                total_grams: 3.25,
                total_invested_inr: 20_000.0,
                transaction_count: 3,
                last_purchase_at: Some(purchased_at()),
            })
        });

    let summary = service(users, transactions, live_price(6_000.0))
        .holdings(&buyer.email)
        .await
        .expect("holdings");

    assert_eq!(summary.user.id(), expected_id);
    assert_eq!(summary.totals.transaction_count, 3);
    assert_eq!(summary.totals.total_grams, 3.25);
}
