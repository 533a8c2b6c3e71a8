//! Call protocol behaviour across two or more phones

use std::time::Duration;

use phonesim_core::{create_phone, CallError, Phone, PhoneStatus};

fn pair() -> (Phone, Phone) {
    (create_phone("5005550001"), create_phone("5005550002"))
}

/// Let the paused clock run past `secs` and give released tasks a turn
async fn run_for(secs: u64) {
    tokio::time::sleep(Duration::from_secs(secs)).await;
    tokio::task::yield_now().await;
}

#[tokio::test(start_paused = true)]
async fn test_accepted_call_busy_then_released() {
    let (a, b) = pair();

    a.call(&b, true, Duration::from_secs(2)).await.unwrap();
    assert!(!a.is_available());
    assert!(!b.is_available());

    run_for(1).await;
    assert_eq!(a.status(), PhoneStatus::Busy);
    assert_eq!(b.status(), PhoneStatus::Busy);

    run_for(2).await;
    assert!(a.is_available());
    assert!(b.is_available());

    let outbound = a.outbound_history();
    let inbound = b.inbound_history();
    assert_eq!(outbound.len(), 1);
    assert_eq!(inbound.len(), 1);
    assert!(a.inbound_history().is_empty());
    assert!(b.outbound_history().is_empty());

    assert_eq!(outbound[0].counterparty_number(), "5005550002");
    assert!(outbound[0].accepted());
    assert!(outbound[0].was_available());
    assert_eq!(outbound[0].duration(), Duration::from_secs(2));
    assert_eq!(inbound[0].counterparty_number(), "5005550001");
    assert!(inbound[0].accepted());
}

#[tokio::test]
async fn test_rejected_call_never_busy() {
    let (a, b) = pair();

    let err = a.call(&b, false, Duration::ZERO).await.unwrap_err();
    assert_eq!(
        err,
        CallError::Rejected {
            from: "5005550001".to_string(),
            to: "5005550002".to_string(),
        }
    );
    assert!(a.is_available());
    assert!(b.is_available());

    let outbound = a.outbound_history();
    let inbound = b.inbound_history();
    assert_eq!(outbound.len(), 1);
    assert_eq!(inbound.len(), 1);
    for record in outbound.iter().chain(inbound.iter()) {
        assert!(!record.accepted());
        assert!(record.was_available());
        assert_eq!(record.duration(), Duration::ZERO);
    }
}

#[tokio::test(start_paused = true)]
async fn test_destination_busy() {
    let (a, b) = pair();
    let c = create_phone("5005550003");

    b.call(&c, true, Duration::from_secs(30)).await.unwrap();
    assert!(!b.is_available());

    let err = a.call(&b, true, Duration::from_secs(5)).await.unwrap_err();
    assert!(matches!(err, CallError::DestinationBusy { .. }));
    assert!(a.is_available());
    assert!(!b.is_available());

    let outbound = a.outbound_history();
    assert_eq!(outbound.len(), 1);
    assert!(!outbound[0].accepted());
    assert!(!outbound[0].was_available());
    assert_eq!(outbound[0].duration(), Duration::ZERO);

    let inbound = b.inbound_history();
    assert_eq!(inbound.len(), 1);
    assert_eq!(inbound[0].counterparty_number(), "5005550001");
    assert!(!inbound[0].was_available());
    assert_eq!(inbound[0].duration(), Duration::ZERO);

    // B's own call is untouched
    assert_eq!(b.outbound_history().len(), 1);
    assert!(b.outbound_history()[0].accepted());
}

#[tokio::test(start_paused = true)]
async fn test_self_busy_records_nothing() {
    let (a, b) = pair();
    let c = create_phone("5005550003");

    a.call(&c, true, Duration::from_secs(10)).await.unwrap();
    let a_before = a.histories();
    let b_before = b.histories();

    let err = a.call(&b, true, Duration::from_secs(1)).await.unwrap_err();
    assert_eq!(
        err,
        CallError::SelfBusy {
            number: "5005550001".to_string()
        }
    );
    assert_eq!(a.histories(), a_before);
    assert_eq!(b.histories(), b_before);
    assert!(b.is_available());
}

#[tokio::test(start_paused = true)]
async fn test_zero_duration_call_goes_through_release() {
    let (a, b) = pair();

    a.call(&b, true, Duration::ZERO).await.unwrap();
    assert!(!a.is_available());
    assert!(!b.is_available());

    run_for(1).await;
    assert!(a.is_available());
    assert!(b.is_available());
}

#[tokio::test(start_paused = true)]
async fn test_registers_newest_first() {
    let (a, b) = pair();

    let _ = a.call(&b, false, Duration::ZERO).await;
    a.call(&b, true, Duration::from_secs(1)).await.unwrap();

    let outbound = a.outbound_history();
    assert_eq!(outbound.len(), 2);
    assert!(outbound[0].accepted());
    assert!(!outbound[1].accepted());
}

#[tokio::test(start_paused = true)]
async fn test_history_reads_are_stable() {
    let (a, b) = pair();
    a.call(&b, true, Duration::from_secs(1)).await.unwrap();

    assert_eq!(a.outbound_history(), a.outbound_history());
    assert_eq!(b.inbound_history(), b.inbound_history());

    run_for(2).await;
    assert_eq!(a.outbound_history(), a.outbound_history());
}

#[tokio::test(start_paused = true)]
async fn test_release_only_ends_its_own_conversation() {
    let (a, b) = pair();
    let c = create_phone("5005550003");

    a.call(&b, true, Duration::from_secs(5)).await.unwrap();
    run_for(6).await;
    assert!(a.is_available());

    // B talks to C after the first release; A's refused attempt on C
    // does not disturb either conversation
    b.call(&c, true, Duration::from_secs(10)).await.unwrap();
    let err = a.call(&c, true, Duration::from_secs(1)).await.unwrap_err();
    assert!(matches!(err, CallError::DestinationBusy { .. }));

    run_for(2).await;
    assert!(!b.is_available());
    assert!(!c.is_available());
    assert!(a.is_available());

    run_for(10).await;
    assert!(b.is_available());
    assert!(c.is_available());
}

#[tokio::test(start_paused = true)]
async fn test_parallel_conversations_release_independently() {
    let (a, b) = pair();
    let c = create_phone("5005550003");
    let d = create_phone("5005550004");

    a.call(&b, true, Duration::from_secs(1)).await.unwrap();
    c.call(&d, true, Duration::from_secs(4)).await.unwrap();

    run_for(2).await;
    assert!(a.is_available());
    assert!(b.is_available());
    assert!(!c.is_available());
    assert!(!d.is_available());

    run_for(3).await;
    assert!(c.is_available());
    assert!(d.is_available());
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_crossing_calls_do_not_deadlock() {
    let phones: Vec<Phone> = (0..8)
        .map(|i| create_phone(format!("60000000{}", i)))
        .collect();

    let mut tasks = Vec::new();
    for round in 0..50usize {
        for i in 0..phones.len() {
            let caller = phones[i].clone();
            let callee = phones[(i + round + 1) % phones.len()].clone();
            tasks.push(tokio::spawn(async move {
                let _ = caller.call(&callee, round % 2 == 0, Duration::from_millis(1)).await;
            }));
        }
    }
    for task in tasks {
        task.await.unwrap();
    }

    tokio::time::sleep(Duration::from_millis(50)).await;
    for phone in &phones {
        assert!(phone.is_available(), "{} still busy", phone);
    }

    // Every recorded attempt shows up once on each side
    let outbound: usize = phones.iter().map(|p| p.outbound_history().len()).sum();
    let inbound: usize = phones.iter().map(|p| p.inbound_history().len()).sum();
    assert_eq!(outbound, inbound);
}
