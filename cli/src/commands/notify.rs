use chrono::Local;
use sprout_core::{NotificationPlatform, NotificationResponse};

use crate::{
    args::NotifyCommand,
    formatters::print_reminders,
    model::ReminderView,
    session::Session,
};

pub async fn notify_cmd(session: &Session, subcommand: NotifyCommand) -> anyhow::Result<()> {
    match subcommand {
        NotifyCommand::Time { time: None } => {
            let time = session.plants.notification_time().await?;
            println!("{}", time);
        }
        NotifyCommand::Time { time: Some(time) } => {
            session.plants.set_notification_time(time).await?;
            println!("Reminders will be sent at {}", time);
        }
        NotifyCommand::List => {
            let pending = session.spool.list_scheduled().await?;
            let views: Vec<ReminderView> = pending.into_iter().map(ReminderView::from).collect();
            print_reminders(&views);
        }
        NotifyCommand::Due => {
            let due = session
                .spool
                .deliver_due(Local::now().naive_local())
                .await?;
            for reminder in due.into_iter().map(ReminderView::from) {
                println!("{}", reminder.title);
                println!("{}", reminder.body);
                println!("  sprout notify respond {} watered|snooze", reminder.handle);
            }
        }
        NotifyCommand::Respond { handle, action } => {
            let reminder = session
                .spool
                .find(&handle)
                .await?
                .ok_or_else(|| anyhow::anyhow!("Unknown reminder: {}", handle))?;

            let response = NotificationResponse {
                handle,
                action_id: action.action_id().to_string(),
                plant_ids: reminder.request.plant_ids,
            };
            session.plants.notification_response(response).await?;
            println!("Reminder handled");
        }
    }

    Ok(())
}
