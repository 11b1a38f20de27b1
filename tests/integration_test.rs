//! Integration Tests - Strategy, Driver and Adapter Interaction
//!
//! Tests the interaction between usecases, ports, and mock adapters.
//! Uses mockall for trait mocking and tokio::test for async tests.

use std::collections::VecDeque;
use std::sync::Arc;
use std::time::Duration;

use alloy::primitives::{Address, B256, U256};
use mockall::mock;
use mockall::predicate::*;

use threshold_bot::domain::position::{AssetId, OnChainPosition, OpenedPosition, PositionId, TxHandle, asset_id};
use threshold_bot::domain::threshold::{Action, ThresholdRule};
use threshold_bot::error::{ErrorKind, ExchangeError, ExchangeResult};
use threshold_bot::ports::futures::FuturesExchange;
use threshold_bot::ports::spot::{
    BalanceResponse, OrderIdResponse, SpotExchange, SpotOrder, SpotOrderId, TxHashResponse,
};
use threshold_bot::usecases::{
    Driver, DriverTiming, FuturesStrategy, SpotParams, SpotStrategy, StepOutcome, TradeParams,
};

// ---- Mock Definitions ----

mock! {
    pub Futures {}

    #[async_trait::async_trait]
    impl FuturesExchange for Futures {
        async fn deposit_collateral(&self, token: Address, amount: U256) -> ExchangeResult<TxHandle>;

        async fn open_position(
            &self,
            asset: AssetId,
            size: U256,
            is_long: bool,
            collateral_token: Address,
            collateral_amount: U256,
        ) -> ExchangeResult<OpenedPosition>;

        async fn close_position(
            &self,
            position_id: PositionId,
            collateral_token: Address,
            collateral_amount: U256,
        ) -> ExchangeResult<TxHandle>;

        async fn get_position(&self, position_id: PositionId) -> ExchangeResult<OnChainPosition>;

        async fn get_balance(&self, token: Address) -> ExchangeResult<U256>;

        async fn get_price(&self, asset: AssetId) -> ExchangeResult<f64>;
    }
}

mock! {
    pub Spot {}

    #[async_trait::async_trait]
    impl SpotExchange for Spot {
        async fn get_balance(&self, token: &str, user: &str) -> ExchangeResult<BalanceResponse>;
        async fn deposit(&self, token: &str, amount: &str) -> ExchangeResult<TxHashResponse>;
        async fn withdraw(&self, token: &str, amount: &str) -> ExchangeResult<TxHashResponse>;
        async fn create_order(
            &self,
            base: &str,
            quote: &str,
            price: &str,
            amount: &str,
            is_buy: bool,
        ) -> ExchangeResult<OrderIdResponse>;
        async fn cancel_order(&self, order_id: SpotOrderId) -> ExchangeResult<TxHashResponse>;
        async fn get_order(&self, order_id: SpotOrderId) -> ExchangeResult<SpotOrder>;
    }
}

// ---- Helpers ----

const POSITION: B256 = B256::repeat_byte(0x77);

fn params() -> TradeParams {
    TradeParams {
        asset: asset_id("ETH-USDT"),
        size: U256::from(1_000_000_000_000_000_000u128),
        collateral_token: Address::repeat_byte(0xee),
        collateral_amount: U256::from(1_000_000_000_000_000_000u128),
    }
}

/// Feed `prices` to successive `get_price` calls.
fn with_prices(mock: &mut MockFutures, prices: &[f64]) {
    let mut queue: VecDeque<f64> = prices.iter().copied().collect();
    mock.expect_get_price()
        .with(eq(asset_id("ETH-USDT")))
        .times(prices.len())
        .returning(move |_| Ok(queue.pop_front().expect("price queue exhausted")));
}

fn opened() -> OpenedPosition {
    OpenedPosition {
        position_id: POSITION,
        tx: B256::repeat_byte(0x01),
    }
}

fn strategy(mock: MockFutures) -> FuturesStrategy<MockFutures> {
    FuturesStrategy::new(Arc::new(mock), ThresholdRule::default(), params())
}

// ---- Futures Strategy Scenarios ----

#[tokio::test]
async fn test_two_percent_drop_opens_long() {
    let mut mock = MockFutures::new();
    with_prices(&mut mock, &[100.0, 98.0]);
    mock.expect_open_position()
        .withf(|asset, size, is_long, token, amount| {
            *asset == asset_id("ETH-USDT")
                && *size == params().size
                && *is_long
                && *token == Address::repeat_byte(0xee)
                && *amount == params().collateral_amount
        })
        .times(1)
        .returning(|_, _, _, _, _| Ok(opened()));
    mock.expect_close_position().never();

    let mut strategy = strategy(mock);

    let first = strategy.evaluate().await.unwrap();
    assert_eq!(first.action, Action::Hold);
    assert_eq!(strategy.last_price(), Some(100.0));

    let second = strategy.evaluate().await.unwrap();
    assert_eq!(second.action, Action::Open);
    assert_eq!(strategy.position_id(), Some(POSITION));
    assert!(strategy.position().unwrap().direction.is_long());
    assert_eq!(strategy.last_price(), Some(98.0));
}

#[tokio::test]
async fn test_rise_from_entry_cycle_closes() {
    let mut mock = MockFutures::new();
    with_prices(&mut mock, &[100.0, 98.0, 99.5]);
    mock.expect_open_position()
        .times(1)
        .returning(|_, _, _, _, _| Ok(opened()));
    mock.expect_close_position()
        .with(eq(POSITION), eq(Address::repeat_byte(0xee)), eq(params().collateral_amount))
        .times(1)
        .returning(|_, _, _| Ok(B256::repeat_byte(0x02)));

    let mut strategy = strategy(mock);
    strategy.evaluate().await.unwrap();
    strategy.evaluate().await.unwrap();

    let third = strategy.evaluate().await.unwrap();
    assert_eq!(third.action, Action::Close);
    assert_eq!(strategy.position_id(), None);
    assert_eq!(strategy.last_price(), Some(99.5));
}

#[tokio::test]
async fn test_small_move_holds_and_updates_price() {
    let mut mock = MockFutures::new();
    with_prices(&mut mock, &[100.0, 100.5]);
    mock.expect_open_position().never();
    mock.expect_close_position().never();

    let mut strategy = strategy(mock);
    strategy.evaluate().await.unwrap();
    let outcome = strategy.evaluate().await.unwrap();

    assert_eq!(outcome.action, Action::Hold);
    assert_eq!(strategy.last_price(), Some(100.5));
    assert!(strategy.position().is_none());
}

#[tokio::test]
async fn test_oscillating_prices_reopen() {
    let mut mock = MockFutures::new();
    // open at 98, close at 99 (> 98.98), open again at 97 (< 98.01)
    with_prices(&mut mock, &[100.0, 98.0, 99.0, 97.0]);
    mock.expect_open_position()
        .times(2)
        .returning(|_, _, _, _, _| Ok(opened()));
    mock.expect_close_position()
        .times(1)
        .returning(|_, _, _| Ok(B256::ZERO));

    let mut strategy = strategy(mock);
    let mut actions = Vec::new();
    for _ in 0..4 {
        actions.push(strategy.evaluate().await.unwrap().action);
    }

    assert_eq!(
        actions,
        vec![Action::Hold, Action::Open, Action::Close, Action::Open]
    );
    assert_eq!(strategy.position_id(), Some(POSITION));
}

// ---- Driver Scenarios ----

#[tokio::test]
async fn test_failed_open_keeps_state_and_resumes() {
    let mut mock = MockFutures::new();
    with_prices(&mut mock, &[100.0, 98.0, 98.0]);

    let mut attempts = 0;
    mock.expect_open_position()
        .times(2)
        .returning(move |_, _, _, _, _| {
            attempts += 1;
            if attempts == 1 {
                Err(ExchangeError::Transport("connection reset by peer".into()))
            } else {
                Ok(opened())
            }
        });

    let timing = DriverTiming {
        interval: Duration::from_secs(10),
        fallback: Duration::from_secs(5),
    };
    let mut driver = Driver::new(strategy(mock), timing);

    let first = driver.step().await;
    assert!(matches!(first, StepOutcome::Completed(_)));

    let failed = driver.step().await;
    assert_eq!(failed, StepOutcome::Failed(ErrorKind::Transport));
    assert_eq!(driver.delay_after(&failed), Duration::from_secs(5));
    assert_eq!(driver.cycle().position_id(), None);
    assert_eq!(driver.cycle().last_price(), Some(100.0));

    // Same drop against the unchanged last price now opens.
    let resumed = driver.step().await;
    match resumed {
        StepOutcome::Completed(report) => {
            assert_eq!(report.action, Some(Action::Open));
            assert!(report.position_open);
        }
        other => panic!("expected completed cycle, got {other:?}"),
    }
    assert_eq!(driver.delay_after(&resumed), Duration::from_secs(10));
    assert_eq!(driver.cycle().position_id(), Some(POSITION));
}

#[tokio::test]
async fn test_missing_price_source_is_logic_error() {
    let mut mock = MockFutures::new();
    mock.expect_get_price()
        .times(1)
        .returning(|_| Err(ExchangeError::NotImplemented("price source")));
    mock.expect_open_position().never();

    let mut driver = Driver::new(strategy(mock), DriverTiming::default());
    assert_eq!(driver.step().await, StepOutcome::Failed(ErrorKind::Logic));
    assert_eq!(driver.cycle().last_price(), None);
}

#[tokio::test]
async fn test_revert_on_close_is_application_error() {
    let mut mock = MockFutures::new();
    with_prices(&mut mock, &[100.0, 98.0, 100.0]);
    mock.expect_open_position()
        .times(1)
        .returning(|_, _, _, _, _| Ok(opened()));
    mock.expect_close_position()
        .times(1)
        .returning(|_, _, _| Err(ExchangeError::Application("execution reverted".into())));

    let mut driver = Driver::new(strategy(mock), DriverTiming::default());
    driver.step().await;
    driver.step().await;

    assert_eq!(driver.step().await, StepOutcome::Failed(ErrorKind::Application));
    assert_eq!(driver.cycle().position_id(), Some(POSITION));
    assert_eq!(driver.cycle().last_price(), Some(98.0));
}

// ---- Spot Strategy ----

#[tokio::test]
async fn test_spot_strategy_checks_balance_then_buys() {
    let mut mock = MockSpot::new();
    mock.expect_get_balance()
        .with(eq("ETH"), eq("0xuser"))
        .times(1)
        .returning(|token, _| {
            Ok(BalanceResponse {
                token: token.to_string(),
                balance: "5000".to_string(),
            })
        });
    mock.expect_create_order()
        .with(eq("ETH"), eq("USDT"), eq("10000"), eq("1"), eq(true))
        .times(1)
        .returning(|_, _, _, _, _| Ok(OrderIdResponse { order_id: 42 }));

    let mut strategy = SpotStrategy::new(
        Arc::new(mock),
        "0xuser".to_string(),
        SpotParams {
            base: "ETH".to_string(),
            quote: "USDT".to_string(),
            amount: "1".to_string(),
            limit_price: "10000".to_string(),
        },
    );

    let outcome = strategy.place_buy().await.unwrap();
    assert_eq!(outcome.order_id, 42);
    assert_eq!(outcome.balance, "5000");
}

#[tokio::test]
async fn test_spot_balance_failure_skips_order() {
    let mut mock = MockSpot::new();
    mock.expect_get_balance()
        .returning(|_, _| Err(ExchangeError::decode("/spot/balance", "expected struct")));
    mock.expect_create_order().never();

    let strategy = SpotStrategy::new(
        Arc::new(mock),
        "0xuser".to_string(),
        SpotParams {
            base: "ETH".to_string(),
            quote: "USDT".to_string(),
            amount: "1".to_string(),
            limit_price: "10000".to_string(),
        },
    );

    let mut driver = Driver::new(strategy, DriverTiming::default());
    assert_eq!(driver.step().await, StepOutcome::Failed(ErrorKind::Application));
}
