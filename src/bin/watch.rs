//! Sign in to the task backend, print the current tasks and statistics, then print notifications as tasks start and end.
//!
//! Configuration is read from the environment:
//! * `TASKTRACK_API_BASE` (defaults to [`tasktrack::config::API_BASE`])
//! * `TASKTRACK_TOKEN`, or `TASKTRACK_EMAIL` and `TASKTRACK_PASSWORD`
//! * `TASKTRACK_TICK_SECS` (defaults to 30)
//! * `RUST_LOG` to display more info

use std::error::Error;
use std::time::Duration;

use tasktrack::client::Client;
use tasktrack::feedback::feedback_channels;
use tasktrack::session::SessionSettings;
use tasktrack::utils::{print_notification, print_task_list};
use tasktrack::Session;

#[tokio::main]
async fn main() -> Result<(), Box<dyn Error>> {
    env_logger::init();

    if let Ok(base) = std::env::var("TASKTRACK_API_BASE") {
        *tasktrack::config::API_BASE.lock().map_err(|_| "configuration lock is poisoned")? = base;
    }
    let mut client = Client::default_from_config(std::env::var("TASKTRACK_TOKEN").ok())?;

    if client.is_authenticated() == false {
        let email = std::env::var("TASKTRACK_EMAIL")
            .map_err(|_| "Please set TASKTRACK_TOKEN, or TASKTRACK_EMAIL and TASKTRACK_PASSWORD")?;
        let password = std::env::var("TASKTRACK_PASSWORD")
            .map_err(|_| "TASKTRACK_PASSWORD is not set")?;
        let auth = client.login(&email, &password).await?;
        println!("Signed in as {}", auth.user.display_name());
    } else if client.validate_token().await? == false {
        return Err("The token is not valid anymore. Please sign in again".into());
    }

    let tick_period = match std::env::var("TASKTRACK_TICK_SECS") {
        Ok(secs) => match secs.parse()? {
            0 => return Err("TASKTRACK_TICK_SECS must be at least 1".into()),
            secs => Duration::from_secs(secs),
        },
        Err(_) => tasktrack::config::DEFAULT_TICK_PERIOD,
    };
    let settings = SessionSettings { tick_period, ..SessionSettings::default() };

    let (senders, mut notifications, statistics) = feedback_channels();
    let mut session = Session::with_settings(client, senders, settings);

    session.refresh().await?;
    println!("---- Tasks -----");
    print_task_list(session.tasks());
    println!("---- Statistics -----");
    println!("{}", *statistics.borrow());

    let shared = session.into_shared();
    let timer = tokio::spawn(Session::run_notification_timer(shared));

    println!("Waiting for tasks to start or end (Ctrl+C to quit)...");
    while let Some(event) = notifications.recv().await {
        print_notification(&event);
    }

    timer.await??;
    Ok(())
}
