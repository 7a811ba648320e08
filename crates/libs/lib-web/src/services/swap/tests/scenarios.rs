//! Full runs, one per way a swap can end.

use super::mocks::{expired, landed, pending, route_for, MockReader, MockRouter};
use super::*;

fn keypair() -> Arc<Keypair> {
    Arc::new(Keypair::new())
}

/// Reader for 1.5 SOL -> USDC that settles at 2.5 -> 1.0 SOL and 0 -> 310.2 USDC.
fn settling_reader() -> MockReader {
    MockReader::new()
        .with_decimals(&Mint::native(), Ok(9))
        .with_balances(&Mint::native(), vec![Ok(dec("2.5")), Ok(dec("1.0"))])
        .with_balances(&Mint::new(USDC), vec![Ok(dec("0")), Ok(dec("310.2"))])
}

fn logs_contain(outcome: &SwapOutcome, needle: &str) -> bool {
    outcome.logs.iter().any(|entry| entry.message.contains(needle))
}

#[tokio::test(start_paused = true)]
async fn test_swap_settles_after_two_pending_checks() {
    let keypair = keypair();
    let router = Arc::new(
        MockRouter::new(Ok(route_for(&keypair.pubkey())))
            .with_statuses(vec![pending(), pending(), landed()]),
    );
    let reader = Arc::new(settling_reader());

    let outcome = test_service(&router, &reader, &keypair).execute(&sol_to_usdc()).await;

    let SwapResult::Settled(settled) = &outcome.result else {
        panic!("expected a settled swap, got {:?}", outcome.result);
    };
    assert_eq!(settled.tracking_id, "5xTrackingHash");
    assert_eq!(settled.explorer_url, "https://solscan.io/tx/5xTrackingHash");
    assert_eq!(settled.diff.input_token, dec("-1.5"));
    assert_eq!(settled.diff.output_token, dec("310.2"));
    assert_eq!(settled.before.phase, SnapshotPhase::Before);
    assert_eq!(settled.after.phase, SnapshotPhase::After);

    assert_eq!(router.status_calls(), 3);
    assert_eq!(router.submit_calls(), 1);
    assert_eq!(router.route_params.lock().unwrap()[0].in_amount, 1_500_000_000);
    assert_eq!(router.route_params.lock().unwrap()[0].from_address, keypair.pubkey().to_string());

    assert!(outcome.is_success());
    assert_eq!(outcome.wallet_address, keypair.pubkey().to_string());
    assert!(outcome.logs.len() >= 6);
    assert!(outcome.logs.windows(2).all(|w| w[0].timestamp <= w[1].timestamp));
}

#[tokio::test(start_paused = true)]
async fn test_route_failure_stops_before_submit() {
    let keypair = keypair();
    let router = Arc::new(MockRouter::new(Err(AppError::Route("insufficient liquidity".to_string()))));
    let reader = Arc::new(settling_reader());

    let outcome = test_service(&router, &reader, &keypair).execute(&sol_to_usdc()).await;

    assert_eq!(
        outcome.result,
        SwapResult::Failed {
            error: AppError::Route("insufficient liquidity".to_string()),
            tracking_id: None,
        }
    );
    assert_eq!(router.submit_calls(), 0);
    assert_eq!(router.status_calls(), 0);
    assert!(logs_contain(&outcome, "insufficient liquidity"));
}

#[tokio::test(start_paused = true)]
async fn test_expired_swap_skips_after_snapshot() {
    let keypair = keypair();
    let router = Arc::new(
        MockRouter::new(Ok(route_for(&keypair.pubkey()))).with_statuses(vec![pending(), expired()]),
    );
    let reader = Arc::new(settling_reader());

    let outcome = test_service(&router, &reader, &keypair).execute(&sol_to_usdc()).await;

    assert_eq!(
        outcome.result,
        SwapResult::Unsettled {
            tracking_id: "5xTrackingHash".to_string(),
            status: SettlementStatus::Expired,
        }
    );
    // before snapshot only
    assert_eq!(reader.balance_calls.load(std::sync::atomic::Ordering::SeqCst), 2);
    assert_eq!(router.status_calls(), 2);
    assert!(logs_contain(&outcome, "Transaction expired"));
}

#[tokio::test(start_paused = true)]
async fn test_identical_tokens_rejected_without_network() {
    let keypair = keypair();
    let router = Arc::new(MockRouter::new(Ok(route_for(&keypair.pubkey()))));
    let reader = Arc::new(settling_reader());
    let request = SwapRequest::new(Mint::new(USDC), Mint::new(USDC), dec("1"));

    let outcome = test_service(&router, &reader, &keypair).execute(&request).await;

    assert!(matches!(
        outcome.result,
        SwapResult::Failed { error: AppError::Validation(_), tracking_id: None }
    ));
    assert_eq!(outcome.logs.len(), 1);
    assert!(outcome.logs[0].message.starts_with("Request rejected"));
    assert_eq!(router.route_calls(), 0);
    assert_eq!(reader.network_calls(), 0);
}

#[tokio::test(start_paused = true)]
async fn test_non_positive_amount_rejected() {
    let keypair = keypair();
    let router = Arc::new(MockRouter::new(Ok(route_for(&keypair.pubkey()))));
    let reader = Arc::new(settling_reader());
    let request = SwapRequest::new(Mint::native(), Mint::new(USDC), dec("0"));

    let outcome = test_service(&router, &reader, &keypair).execute(&request).await;

    assert!(matches!(outcome.result, SwapResult::Failed { error: AppError::Validation(_), .. }));
    assert_eq!(reader.network_calls(), 0);
}

#[tokio::test(start_paused = true)]
async fn test_unresolvable_decimals_rejected_before_route() {
    let keypair = keypair();
    let router = Arc::new(MockRouter::new(Ok(route_for(&keypair.pubkey()))));
    let reader = Arc::new(MockReader::new());
    let request = SwapRequest::new(Mint::new(USDC), Mint::native(), dec("10"));

    let outcome = test_service(&router, &reader, &keypair).execute(&request).await;

    assert!(matches!(outcome.result, SwapResult::Failed { error: AppError::Validation(_), .. }));
    assert_eq!(router.route_calls(), 0);
}

#[tokio::test(start_paused = true)]
async fn test_dust_amount_rejected() {
    let keypair = keypair();
    let router = Arc::new(MockRouter::new(Ok(route_for(&keypair.pubkey()))));
    let reader = Arc::new(settling_reader());
    let request = SwapRequest::new(Mint::native(), Mint::new(USDC), dec("0.0000000001"));

    let outcome = test_service(&router, &reader, &keypair).execute(&request).await;

    assert!(matches!(outcome.result, SwapResult::Failed { error: AppError::Validation(_), .. }));
    assert_eq!(router.route_calls(), 0);
}

#[tokio::test(start_paused = true)]
async fn test_unsignable_route_is_sign_error() {
    let keypair = keypair();
    let foreign_route = route_for(&Keypair::new().pubkey());
    let router = Arc::new(MockRouter::new(Ok(foreign_route)));
    let reader = Arc::new(settling_reader());

    let outcome = test_service(&router, &reader, &keypair).execute(&sol_to_usdc()).await;

    assert!(matches!(outcome.result, SwapResult::Failed { error: AppError::Sign(_), tracking_id: None }));
    assert_eq!(router.submit_calls(), 0);
    assert!(logs_contain(&outcome, "Sign error"));
}

#[tokio::test(start_paused = true)]
async fn test_submit_rejection_ends_run() {
    let keypair = keypair();
    let router = Arc::new(
        MockRouter::new(Ok(route_for(&keypair.pubkey())))
            .with_submit(Err(AppError::Submit("blockhash not found".to_string()))),
    );
    let reader = Arc::new(settling_reader());

    let outcome = test_service(&router, &reader, &keypair).execute(&sol_to_usdc()).await;

    assert_eq!(
        outcome.result,
        SwapResult::Failed {
            error: AppError::Submit("blockhash not found".to_string()),
            tracking_id: None,
        }
    );
    assert_eq!(router.status_calls(), 0);
    assert!(logs_contain(&outcome, "blockhash not found"));
}

#[tokio::test(start_paused = true)]
async fn test_status_query_failure_keeps_tracking_id() {
    let keypair = keypair();
    let router = Arc::new(
        MockRouter::new(Ok(route_for(&keypair.pubkey())))
            .with_statuses(vec![pending(), Err(AppError::Status("rate limited".to_string()))]),
    );
    let reader = Arc::new(settling_reader());

    let outcome = test_service(&router, &reader, &keypair).execute(&sol_to_usdc()).await;

    assert_eq!(
        outcome.result,
        SwapResult::Failed {
            error: AppError::Status("rate limited".to_string()),
            tracking_id: Some("5xTrackingHash".to_string()),
        }
    );
    // failed queries are not retried
    assert_eq!(router.status_calls(), 2);
}

#[tokio::test(start_paused = true)]
async fn test_polling_stops_at_attempt_bound() {
    let keypair = keypair();
    let router = Arc::new(MockRouter::new(Ok(route_for(&keypair.pubkey()))));
    let reader = Arc::new(settling_reader());
    let policy = PollPolicy {
        interval: Duration::from_secs(1),
        max_attempts: Some(3),
        timeout: None,
    };

    let outcome = test_service(&router, &reader, &keypair)
        .with_policy(policy)
        .execute(&sol_to_usdc())
        .await;

    let SwapResult::Unsettled { status, .. } = &outcome.result else {
        panic!("expected an unsettled swap, got {:?}", outcome.result);
    };
    assert!(matches!(status, SettlementStatus::TimedOut { attempts: 3, .. }));
    assert_eq!(router.status_calls(), 3);
}

#[tokio::test(start_paused = true)]
async fn test_polling_stops_at_timeout() {
    let keypair = keypair();
    let router = Arc::new(MockRouter::new(Ok(route_for(&keypair.pubkey()))));
    let reader = Arc::new(settling_reader());
    let policy = PollPolicy {
        interval: Duration::from_secs(2),
        max_attempts: None,
        timeout: Some(Duration::from_secs(5)),
    };

    let outcome = test_service(&router, &reader, &keypair)
        .with_policy(policy)
        .execute(&sol_to_usdc())
        .await;

    // checks at t = 0, 2, 4, 6; the fourth sees 6s >= 5s
    let SwapResult::Unsettled { status, .. } = &outcome.result else {
        panic!("expected an unsettled swap, got {:?}", outcome.result);
    };
    assert!(matches!(status, SettlementStatus::TimedOut { attempts: 4, .. }));
}

#[tokio::test(start_paused = true)]
async fn test_failed_balance_reads_still_settle() {
    let keypair = keypair();
    let router = Arc::new(MockRouter::new(Ok(route_for(&keypair.pubkey()))).with_statuses(vec![landed()]));
    let reader = Arc::new(
        MockReader::new()
            .with_decimals(&Mint::native(), Ok(9))
            .with_balances(
                &Mint::native(),
                vec![Err(AppError::Rpc("timeout".to_string())), Ok(dec("1"))],
            ),
    );

    let outcome = test_service(&router, &reader, &keypair).execute(&sol_to_usdc()).await;

    let SwapResult::Settled(settled) = &outcome.result else {
        panic!("expected a settled swap, got {:?}", outcome.result);
    };
    assert_eq!(settled.before.input_token_amount, Decimal::ZERO);
    assert_eq!(settled.diff.input_token, dec("1"));
    assert!(logs_contain(&outcome, "Balance read failed"));
}

#[tokio::test(start_paused = true)]
async fn test_concurrent_runs_keep_separate_logs() {
    let keypair = keypair();
    let service = Arc::new(SwapService::new(
        Arc::new(MockRouter::new(Err(AppError::Route("no route".to_string())))),
        Arc::new(settling_reader()),
        keypair.clone(),
        &Config::default(),
    ));
    let rejected = SwapRequest::new(Mint::new(USDC), Mint::new(USDC), dec("1"));

    let first = sol_to_usdc();
    let (a, b) = tokio::join!(service.execute(&first), service.execute(&rejected));

    assert_ne!(a.run_id, b.run_id);
    assert!(logs_contain(&a, "no route"));
    assert!(!logs_contain(&b, "no route"));
    assert_eq!(b.logs.len(), 1);
}
