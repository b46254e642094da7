//! Trailing Stop Engine Integration Tests
//!
//! Runs real trailing sessions against the paper gateway on a paused clock.
//! The engine polls every 500ms; tests sleep to just past each poll.

#![allow(clippy::expect_used, clippy::unwrap_used)]

mod common;

use std::sync::Arc;
use std::time::Duration;

use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use tokio::time::Instant;

use common::{ASK, BID, constraints, eurusd, paper_gateway, retry};
use trade_guard::application::ports::{GatewayError, RetCode};
use trade_guard::application::services::{
    RetryExecutor, RetryPolicy, TrailExit, TrailingConfig, TrailingStopEngine,
};
use trade_guard::domain::shared::{Side, Ticket};
use trade_guard::domain::trailing::{TrailMode, TrailParams};
use trade_guard::error::FailureKind;
use trade_guard::infrastructure::gateway::{PaperCall, PaperGateway};

const POLL: Duration = Duration::from_millis(500);

fn engine(gateway: &Arc<PaperGateway>) -> TrailingStopEngine<PaperGateway> {
    TrailingStopEngine::new(
        Arc::clone(gateway),
        constraints(gateway),
        retry(),
        TrailingConfig {
            poll_interval: POLL,
        },
    )
}

fn long_trail(ticket: Ticket) -> TrailParams {
    TrailParams::classic(ticket, "EURUSD", Side::Buy, dec!(150), dec!(20))
}

/// Let the first (immediate) poll run.
async fn settle() {
    tokio::time::sleep(Duration::from_millis(10)).await;
}

/// Advance past the next poll.
async fn next_poll() {
    tokio::time::sleep(POLL).await;
}

fn set_bid(gateway: &PaperGateway, bid: Decimal) {
    gateway.set_quote(&eurusd(), bid, bid + (ASK - BID));
}

#[tokio::test(start_paused = true)]
async fn test_stop_moves_only_when_improvement_reaches_step() {
    let gateway = paper_gateway();
    let ticket = gateway
        .seed_position(&eurusd(), Side::Buy, dec!(0.1), None)
        .expect("should seed");
    let engine = engine(&gateway);

    engine.start(long_trail(ticket)).await.expect("should start");
    settle().await;
    assert_eq!(gateway.stop_loss_history(ticket), vec![dec!(1.09850)]);

    // Candidate improves by 15 points, below the 20 point step.
    set_bid(&gateway, dec!(1.10015));
    next_poll().await;
    assert_eq!(gateway.stop_loss_history(ticket), vec![dec!(1.09850)]);

    // Candidate improves by 25 points.
    set_bid(&gateway, dec!(1.10025));
    next_poll().await;
    assert_eq!(
        gateway.stop_loss_history(ticket),
        vec![dec!(1.09850), dec!(1.09875)]
    );

    // Price falls back: the stop never loosens.
    set_bid(&gateway, dec!(1.09950));
    next_poll().await;
    assert_eq!(gateway.stop_loss_history(ticket).len(), 2);
    let position = gateway.position(ticket).expect("still open");
    assert_eq!(position.stop_loss, Some(dec!(1.09875)));

    engine.shutdown().await;
}

#[tokio::test(start_paused = true)]
async fn test_short_position_trails_from_ask() {
    let gateway = paper_gateway();
    let ticket = gateway
        .seed_position(&eurusd(), Side::Sell, dec!(0.1), None)
        .expect("should seed");
    let engine = engine(&gateway);

    engine
        .start(TrailParams::classic(ticket, "EURUSD", Side::Sell, dec!(100), dec!(10)))
        .await
        .expect("should start");
    settle().await;
    assert_eq!(gateway.stop_loss_history(ticket), vec![dec!(1.10110)]);

    set_bid(&gateway, dec!(1.09950));
    next_poll().await;
    assert_eq!(
        gateway.stop_loss_history(ticket),
        vec![dec!(1.10110), dec!(1.10060)]
    );

    engine.shutdown().await;
}

#[tokio::test(start_paused = true)]
async fn test_existing_tighter_stop_is_kept() {
    let gateway = paper_gateway();
    let ticket = gateway
        .seed_position(&eurusd(), Side::Buy, dec!(0.1), Some(dec!(1.09950)))
        .expect("should seed");
    let engine = engine(&gateway);

    engine.start(long_trail(ticket)).await.expect("should start");
    settle().await;
    next_poll().await;

    assert!(gateway.stop_loss_history(ticket).is_empty());
    engine.shutdown().await;
}

#[tokio::test(start_paused = true)]
async fn test_chandelier_holds_stop_through_pullback() {
    let gateway = paper_gateway();
    let ticket = gateway
        .seed_position(&eurusd(), Side::Buy, dec!(0.1), None)
        .expect("should seed");
    let engine = engine(&gateway);

    engine
        .start(long_trail(ticket).with_mode(TrailMode::Chandelier))
        .await
        .expect("should start");
    settle().await;

    set_bid(&gateway, dec!(1.10100));
    next_poll().await;
    set_bid(&gateway, dec!(1.10040));
    next_poll().await;

    assert_eq!(
        gateway.stop_loss_history(ticket),
        vec![dec!(1.09850), dec!(1.09950)]
    );
    engine.shutdown().await;
}

#[tokio::test(start_paused = true)]
async fn test_session_ends_when_position_closes() {
    let gateway = paper_gateway();
    let ticket = gateway
        .seed_position(&eurusd(), Side::Buy, dec!(0.1), None)
        .expect("should seed");
    let engine = engine(&gateway);

    engine.start(long_trail(ticket)).await.expect("should start");
    settle().await;
    assert!(engine.is_active(ticket));

    gateway.remove_position(ticket);
    next_poll().await;

    assert!(!engine.is_active(ticket));
    assert!(engine.active_tickets().is_empty());
    assert_eq!(engine.stop(ticket).await, None);
}

#[tokio::test(start_paused = true)]
async fn test_failed_update_is_retried_next_poll() {
    let gateway = paper_gateway();
    let ticket = gateway
        .seed_position(&eurusd(), Side::Buy, dec!(0.1), None)
        .expect("should seed");
    gateway.fail_next(
        PaperCall::ModifyPosition,
        GatewayError::Rejected {
            ret_code: RetCode::INVALID_STOPS,
            description: "Invalid stops".to_string(),
        },
    );
    let engine = engine(&gateway);

    engine.start(long_trail(ticket)).await.expect("should start");
    settle().await;
    assert!(gateway.stop_loss_history(ticket).is_empty());
    assert!(engine.is_active(ticket));

    next_poll().await;
    assert_eq!(gateway.stop_loss_history(ticket), vec![dec!(1.09850)]);
    assert_eq!(gateway.call_count(PaperCall::ModifyPosition), 2);

    engine.shutdown().await;
}

#[tokio::test(start_paused = true)]
async fn test_price_outage_does_not_end_session() {
    let gateway = paper_gateway();
    let ticket = gateway
        .seed_position(&eurusd(), Side::Buy, dec!(0.1), None)
        .expect("should seed");
    gateway.fail_next(
        PaperCall::CurrentPrice,
        GatewayError::Transport("terminal unreachable".to_string()),
    );
    let engine = engine(&gateway);

    engine.start(long_trail(ticket)).await.expect("should start");
    settle().await;
    assert!(gateway.stop_loss_history(ticket).is_empty());

    next_poll().await;
    assert_eq!(gateway.stop_loss_history(ticket), vec![dec!(1.09850)]);
    engine.shutdown().await;
}

#[tokio::test(start_paused = true)]
async fn test_restart_replaces_session() {
    let gateway = paper_gateway();
    let ticket = gateway
        .seed_position(&eurusd(), Side::Buy, dec!(0.1), None)
        .expect("should seed");
    let engine = engine(&gateway);

    engine.start(long_trail(ticket)).await.expect("should start");
    settle().await;
    engine
        .start(TrailParams::classic(ticket, "EURUSD", Side::Buy, dec!(50), dec!(10)))
        .await
        .expect("should restart");
    settle().await;

    assert_eq!(engine.active_tickets(), vec![ticket]);
    assert_eq!(
        gateway.stop_loss_history(ticket),
        vec![dec!(1.09850), dec!(1.09950)]
    );
    engine.shutdown().await;
}

#[tokio::test(start_paused = true)]
async fn test_stop_and_shutdown() {
    let gateway = paper_gateway();
    let first = gateway
        .seed_position(&eurusd(), Side::Buy, dec!(0.1), None)
        .expect("should seed");
    let second = gateway
        .seed_position(&eurusd(), Side::Buy, dec!(0.2), None)
        .expect("should seed");
    let engine = engine(&gateway);

    engine.start(long_trail(first)).await.expect("should start");
    engine.start(long_trail(second)).await.expect("should start");
    assert_eq!(engine.active_tickets(), vec![first, second]);

    assert_eq!(engine.stop(first).await, Some(TrailExit::Cancelled));
    assert_eq!(engine.stop(first).await, None);
    assert_eq!(engine.active_tickets(), vec![second]);

    engine.shutdown().await;
    assert!(engine.active_tickets().is_empty());

    // No loop survives shutdown.
    let modifications = gateway.call_count(PaperCall::ModifyPosition);
    set_bid(&gateway, dec!(1.10500));
    next_poll().await;
    assert_eq!(gateway.call_count(PaperCall::ModifyPosition), modifications);
}

#[tokio::test(start_paused = true)]
async fn test_stop_does_not_wait_for_next_poll() {
    let gateway = paper_gateway();
    let ticket = gateway
        .seed_position(&eurusd(), Side::Buy, dec!(0.1), None)
        .expect("should seed");
    let engine = TrailingStopEngine::new(
        Arc::clone(&gateway),
        constraints(&gateway),
        retry(),
        TrailingConfig {
            poll_interval: Duration::from_secs(60),
        },
    );

    engine.start(long_trail(ticket)).await.expect("should start");
    settle().await;
    assert_eq!(gateway.stop_loss_history(ticket), vec![dec!(1.09850)]);

    // Well inside the 60s wait before the next poll.
    tokio::time::sleep(Duration::from_secs(5)).await;
    let started = Instant::now();
    let exit = engine.stop(ticket).await;

    assert_eq!(exit, Some(TrailExit::Cancelled));
    assert!(started.elapsed() < Duration::from_secs(1));
    assert!(!engine.is_active(ticket));
}

#[tokio::test(start_paused = true)]
async fn test_stop_interrupts_update_backoff() {
    let gateway = paper_gateway();
    let ticket = gateway
        .seed_position(&eurusd(), Side::Buy, dec!(0.1), None)
        .expect("should seed");
    gateway.fail_times(
        PaperCall::ModifyPosition,
        5,
        &GatewayError::Transport("connection reset".to_string()),
    );
    let engine = TrailingStopEngine::new(
        Arc::clone(&gateway),
        constraints(&gateway),
        RetryExecutor::new(RetryPolicy::new(
            5,
            Duration::from_secs(30),
            Duration::from_secs(60),
        )),
        TrailingConfig {
            poll_interval: POLL,
        },
    );

    engine.start(long_trail(ticket)).await.expect("should start");
    settle().await;
    // First attempt failed; the retry is now sleeping 30s.
    assert_eq!(gateway.call_count(PaperCall::ModifyPosition), 1);

    let started = Instant::now();
    let exit = engine.stop(ticket).await;

    assert_eq!(exit, Some(TrailExit::Cancelled));
    assert!(started.elapsed() < Duration::from_secs(1));

    tokio::time::sleep(Duration::from_secs(120)).await;
    assert_eq!(gateway.call_count(PaperCall::ModifyPosition), 1);
    assert!(gateway.stop_loss_history(ticket).is_empty());
}

#[tokio::test]
async fn test_start_rejects_unknown_or_mismatched_position() {
    let gateway = paper_gateway();
    let ticket = gateway
        .seed_position(&eurusd(), Side::Sell, dec!(0.1), None)
        .expect("should seed");
    let engine = engine(&gateway);

    let failure = engine
        .start(long_trail(Ticket::new(404)))
        .await
        .expect_err("no such position");
    assert_eq!(failure.kind, FailureKind::NotFound);

    let failure = engine
        .start(long_trail(ticket))
        .await
        .expect_err("position is short");
    assert_eq!(failure.kind, FailureKind::Validation);

    let failure = engine
        .start(TrailParams::classic(ticket, "EURUSD", Side::Sell, dec!(0), dec!(10)))
        .await
        .expect_err("zero distance");
    assert_eq!(failure.kind, FailureKind::Validation);

    assert!(engine.active_tickets().is_empty());
}
