//! Background runtime that owns the application context.

use std::path::PathBuf;
use std::sync::Arc;

use tokio::sync::mpsc;
use tracing::{debug, error, info};

use notechat_app::{AppContext, ClientFactory};

use crate::event::{BackendCommand, UiEvent};
use crate::sink::{ChannelPicker, ChannelSink};

/// Run the backend loop.
///
/// Runs in a separate thread with its own tokio runtime. Opening and closing
/// the panel run inline so they apply in the order they were pressed.
/// Submissions and actions are spawned so a slow model reply or an open
/// language dialog never blocks the command loop.
pub async fn run_backend(
    settings_path: PathBuf,
    document: Option<PathBuf>,
    factory: Arc<dyn ClientFactory>,
    ui_tx: mpsc::Sender<UiEvent>,
    mut cmd_rx: mpsc::Receiver<BackendCommand>,
) {
    let ctx = match AppContext::start(
        settings_path,
        document.clone(),
        factory,
        Arc::new(ChannelSink::new(ui_tx.clone())),
        Arc::new(ChannelPicker::new(ui_tx.clone())),
    )
    .await
    {
        Ok(ctx) => ctx,
        Err(e) => {
            error!(error = %e, "Failed to start application context");
            let _ = ui_tx
                .send(UiEvent::Fatal(format!("Failed to load settings: {}", e)))
                .await;
            return;
        }
    };

    let settings = ctx.settings.get().await;
    let _ = ui_tx
        .send(UiEvent::Layout {
            docked: settings.is_docked,
            position: settings.floating_position,
        })
        .await;
    let _ = ui_tx
        .send(UiEvent::Configured(ctx.credentials.has_client().await))
        .await;
    let _ = ui_tx.send(UiEvent::Document(document)).await;

    while let Some(cmd) = cmd_rx.recv().await {
        match cmd {
            BackendCommand::TogglePanel => ctx.controller.toggle_session().await,
            BackendCommand::ClosePanel => ctx.controller.close_session().await,
            BackendCommand::Submit(text) => {
                let controller = ctx.controller.clone();
                tokio::spawn(async move { controller.submit(&text).await });
            }
            BackendCommand::RunAction(action) => {
                let controller = ctx.controller.clone();
                tokio::spawn(async move { controller.run_suggested_action(action).await });
            }
            BackendCommand::SetKey(key) => {
                debug!("Updating API key");
                let status = match ctx.credentials.set_key(&key).await {
                    Ok(()) if key.trim().is_empty() => "API key cleared".to_string(),
                    Ok(()) => "API key saved".to_string(),
                    Err(e) => {
                        error!(error = %e, "Failed to save API key");
                        format!("Failed to save API key: {}", e)
                    }
                };
                let _ = ui_tx
                    .send(UiEvent::Configured(ctx.credentials.has_client().await))
                    .await;
                let _ = ui_tx.send(UiEvent::Status(status)).await;
            }
            BackendCommand::SetDocument(path) => {
                debug!(path = ?path, "Switching document");
                ctx.documents.set_path(path.clone()).await;
                let _ = ui_tx.send(UiEvent::Document(path)).await;
                let _ = ui_tx
                    .send(UiEvent::Status(
                        "Document switched; reopen the panel to use it".to_string(),
                    ))
                    .await;
            }
            BackendCommand::ToggleDock => {
                match ctx.settings.update(|s| s.is_docked = !s.is_docked).await {
                    Ok(settings) => {
                        let _ = ui_tx
                            .send(UiEvent::Layout {
                                docked: settings.is_docked,
                                position: settings.floating_position,
                            })
                            .await;
                    }
                    Err(e) => {
                        error!(error = %e, "Failed to save dock state");
                        let _ = ui_tx
                            .send(UiEvent::Status(format!("Failed to save settings: {}", e)))
                            .await;
                    }
                }
            }
            BackendCommand::SavePosition(position) => {
                if let Err(e) = ctx.settings.update(|s| s.floating_position = position).await {
                    error!(error = %e, "Failed to save panel position");
                }
            }
            BackendCommand::Quit => {
                info!("Received quit command, shutting down backend");
                break;
            }
        }
    }

    if let Err(e) = ctx.shutdown().await {
        error!(error = %e, "Failed to save settings on shutdown");
    }

    info!("Backend shutdown complete");
}

#[cfg(test)]
mod tests {
    use notechat_app::GeminiFactory;

    use super::*;

    async fn run_commands(commands: Vec<BackendCommand>) -> Vec<UiEvent> {
        let dir = tempfile::tempdir().unwrap();
        let (ui_tx, mut ui_rx) = mpsc::channel(64);
        let (cmd_tx, cmd_rx) = mpsc::channel(16);
        for cmd in commands {
            cmd_tx.send(cmd).await.unwrap();
        }
        cmd_tx.send(BackendCommand::Quit).await.unwrap();

        run_backend(
            dir.path().join("settings.json"),
            None,
            Arc::new(GeminiFactory::default()),
            ui_tx,
            cmd_rx,
        )
        .await;

        let mut events = Vec::new();
        while let Ok(event) = ui_rx.try_recv() {
            events.push(event);
        }
        events
    }

    fn visibility(events: &[UiEvent]) -> Vec<bool> {
        events
            .iter()
            .filter_map(|event| match event {
                UiEvent::PanelVisible(visible) => Some(*visible),
                _ => None,
            })
            .collect()
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 2)]
    async fn test_close_right_after_open_applies_in_order() {
        let events = run_commands(vec![
            BackendCommand::TogglePanel,
            BackendCommand::ClosePanel,
        ])
        .await;

        assert_eq!(visibility(&events), vec![true, false]);
    }

    #[tokio::test]
    async fn test_toggle_twice_ends_hidden() {
        let events = run_commands(vec![
            BackendCommand::TogglePanel,
            BackendCommand::TogglePanel,
        ])
        .await;

        assert_eq!(visibility(&events), vec![true, false]);
    }

    #[tokio::test]
    async fn test_startup_reports_layout_and_missing_key() {
        let events = run_commands(Vec::new()).await;

        assert!(events.iter().any(|e| matches!(
            e,
            UiEvent::Layout { docked: false, .. }
        )));
        assert!(events
            .iter()
            .any(|e| matches!(e, UiEvent::Configured(false))));
    }
}
