//! Scenarios that exercise a whole session: a source, a snapshot, notifications and statistics

use std::time::Duration as StdDuration;

use chrono::Duration;

use tasktrack::feedback::{feedback_channels, NotificationReceiver};
use tasktrack::filter::SearchFilter;
use tasktrack::mock_behaviour::MockBehaviour;
use tasktrack::notification::{NotificationEvent, NotificationKind, ReloadPolicy};
use tasktrack::session::SessionSettings;
use tasktrack::traits::TaskSource;
use tasktrack::{Error, NewTask, Session, StatisticsSnapshot, TaskId, TaskUpdate};

use scenarii::{busy_week, populate_cache, reference_time, single_starting_task};

fn init_logger() {
    let _ = env_logger::builder().is_test(true).try_init();
}

#[tokio::test]
async fn single_task_scenario() {
    init_logger();
    let now = reference_time();
    let (senders, mut notif_rx, stats_rx) = feedback_channels();
    let mut session = Session::new(populate_cache(&single_starting_task()), senders);

    let stats = session.refresh_at(&now).await.unwrap();
    assert_eq!(stats, StatisticsSnapshot {
        total: 1,
        completed: 0,
        pending: 1,
        high_priority: 1,
        work: 1,
        personal: 0,
        today: 1,
        overdue: 0,
    });
    assert_eq!(*stats_rx.borrow(), stats);

    let events = session.tick(&now);
    assert_eq!(events, vec![NotificationEvent {
        kind: NotificationKind::Starting,
        task_id: TaskId::from(1),
        description: "Stand-up meeting".to_string(),
    }]);
    assert_eq!(notif_rx.try_recv().unwrap(), events[0]);

    // Same time, same snapshot: nothing new
    assert!(session.tick(&now).is_empty());
    assert!(notif_rx.try_recv().is_err());
}

#[tokio::test]
async fn busy_week_notifications() {
    init_logger();
    let now = reference_time();
    let (senders, _notif_rx, _stats_rx) = feedback_channels();
    let mut session = Session::new(populate_cache(&busy_week()), senders);
    session.refresh_at(&now).await.unwrap();

    let mut fired: Vec<(i64, NotificationKind)> = session.tick(&now).into_iter()
        .map(|e| (e.task_id.as_number().unwrap(), e.kind))
        .collect();
    fired.sort_by_key(|(id, kind)| (*id, *kind == NotificationKind::Ending));
    assert_eq!(fired, vec![
        (1, NotificationKind::Starting),
        (2, NotificationKind::Ending),
        (3, NotificationKind::Starting),
        (3, NotificationKind::Ending),
    ]);

    let stats = session.update_statistics(&now);
    assert_eq!(stats.total, 7);
    assert_eq!(stats.completed, 2);
    assert_eq!(stats.pending, 5);
    assert_eq!(stats.pending, stats.total - stats.completed);
    assert_eq!(stats.high_priority, 2);
    assert_eq!(stats.work, 2);
    assert_eq!(stats.personal, 4);
    assert_eq!(stats.today, 4);
    // task 2 ended 45 seconds ago, task 5 yesterday; the completed task 6 does not count
    assert_eq!(stats.overdue, 2);

    assert_eq!(session.update_statistics(&now), stats);
}

#[tokio::test]
async fn reload_resets_flags_by_default() {
    init_logger();
    let now = reference_time();
    let mut session = Session::new(populate_cache(&single_starting_task()), feedback_channels().0);

    session.refresh_at(&now).await.unwrap();
    assert_eq!(session.tick(&now).len(), 1);

    session.refresh_at(&now).await.unwrap();
    assert_eq!(session.tick(&now).len(), 1);
}

#[tokio::test]
async fn reload_can_keep_flags() {
    init_logger();
    let now = reference_time();
    let settings = SessionSettings { reload_policy: ReloadPolicy::KeepFlags, ..SessionSettings::default() };
    let mut session = Session::with_settings(populate_cache(&single_starting_task()), feedback_channels().0, settings);

    session.refresh_at(&now).await.unwrap();
    assert_eq!(session.tick(&now).len(), 1);

    session.refresh_at(&now).await.unwrap();
    assert!(session.tick(&now).is_empty());
    assert!(session.engine().is_start_notified(&TaskId::from(1)));
}

#[tokio::test]
async fn search_for_a_missing_task_is_empty() {
    init_logger();
    let session = Session::new(populate_cache(&busy_week()), feedback_channels().0);

    let found = session.search(&TaskId::from(5)).await.unwrap();
    assert_eq!(found.len(), 1);
    assert_eq!(found[0].description(), "Tax return");

    assert!(session.search(&TaskId::from(404)).await.unwrap().is_empty());
}

#[tokio::test]
async fn failed_refresh_keeps_the_snapshot() {
    init_logger();
    let now = reference_time();
    let mut session = Session::new(populate_cache(&busy_week()), feedback_channels().0);
    session.refresh_at(&now).await.unwrap();
    let generation = session.store().generation();

    session.source_mut().set_mock_behaviour(Some(MockBehaviour::fail_now(1)));
    assert!(session.refresh_at(&now).await.is_err());
    assert_eq!(session.tasks().len(), 7);
    assert_eq!(session.store().generation(), generation);

    assert!(session.refresh_at(&now).await.is_ok());
    assert_eq!(session.store().generation(), generation + 1);
}

#[tokio::test]
async fn changes_reload_the_snapshot() {
    init_logger();
    let now = reference_time();
    let (senders, _notif_rx, stats_rx) = feedback_channels();
    let mut session = Session::new(populate_cache(&single_starting_task()), senders);
    session.refresh_at(&now).await.unwrap();

    let start = (now + Duration::hours(3)).naive_local();
    let created = session.add_task(NewTask::new("Lunch".to_string(), start, start + Duration::hours(1))).await.unwrap();
    assert_eq!(created.id(), &TaskId::from(2));
    assert_eq!(session.tasks().len(), 2);
    assert_eq!(stats_rx.borrow().total, 2);

    let toggled = session.toggle_task(created.id()).await.unwrap().unwrap();
    assert!(toggled.done());
    assert!(session.store().get(created.id()).unwrap().done());

    let mut update = TaskUpdate::from(&toggled);
    update.description = "Long lunch".to_string();
    session.update_task(created.id(), update).await.unwrap();
    assert_eq!(session.store().get(created.id()).unwrap().description(), "Long lunch");

    assert!(session.delete_task(created.id()).await.unwrap());
    assert_eq!(session.tasks().len(), 1);
    assert!(session.delete_task(created.id()).await.unwrap() == false);
    assert!(session.toggle_task(created.id()).await.unwrap().is_none());

    assert!(session.source().get_task(created.id()).await.unwrap().is_none());
}

#[tokio::test]
async fn local_filters() {
    init_logger();
    let now = reference_time();
    let mut session = Session::new(populate_cache(&busy_week()), feedback_channels().0);
    session.refresh_at(&now).await.unwrap();

    let ids = |filter: SearchFilter| -> Vec<i64> {
        let mut ids: Vec<i64> = session.filter(&filter, &now).iter()
            .filter_map(|t| t.id().as_number())
            .collect();
        ids.sort();
        ids
    };
    assert_eq!(ids(SearchFilter::Overdue), vec![2, 5]);
    assert_eq!(ids(SearchFilter::Done(true)), vec![4, 6]);
    assert_eq!(ids(SearchFilter::StartingSoon), vec![1]);
}

fn timer_session(tick_period: StdDuration) -> (Session<tasktrack::cache::Cache>, NotificationReceiver) {
    let (senders, notif_rx, _stats_rx) = feedback_channels();
    let settings = SessionSettings { tick_period, ..SessionSettings::default() };
    (Session::with_settings(populate_cache(&single_starting_task()), senders, settings), notif_rx)
}

#[tokio::test]
async fn notification_timer() {
    init_logger();
    let (mut session, mut notif_rx) = timer_session(StdDuration::from_millis(10));
    session.refresh_at(&reference_time()).await.unwrap();

    let shared = session.into_shared();
    let timer = tokio::spawn(Session::run_notification_timer_with_clock(shared.clone(), reference_time));

    let event = notif_rx.recv().await.unwrap();
    assert_eq!(event.kind, NotificationKind::Starting);
    assert_eq!(event.task_id, TaskId::from(1));

    // The timer stops once nobody listens anymore
    drop(notif_rx);
    timer.await.unwrap().unwrap();
    assert!(shared.lock().await.engine().is_start_notified(&TaskId::from(1)));
}

#[tokio::test]
async fn notification_timer_follows_the_tick_period() {
    init_logger();
    let (mut session, mut notif_rx) = timer_session(StdDuration::from_secs(3600));
    session.refresh_at(&reference_time()).await.unwrap();

    let mut timer = tokio::spawn(Session::run_notification_timer_with_clock(session.into_shared(), reference_time));

    // The first scan is immediate, the next one is an hour away
    assert_eq!(notif_rx.recv().await.unwrap().task_id, TaskId::from(1));
    drop(notif_rx);
    assert!(tokio::time::timeout(StdDuration::from_millis(200), &mut timer).await.is_err());
    timer.abort();
}

#[tokio::test]
async fn notification_timer_refuses_a_zero_period() {
    init_logger();
    let (session, _notif_rx) = timer_session(StdDuration::from_secs(0));

    let result = Session::run_notification_timer_with_clock(session.into_shared(), reference_time).await;
    match result {
        Err(Error::InvalidInput(_)) => {},
        other => panic!("Unexpected result {:?}", other),
    }
}
