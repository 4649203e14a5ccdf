//! TUI event loop.
//!
//! Runs on the main thread: drains UI requests from background tasks, draws
//! a frame, and turns key presses into controller calls. Async work (mount,
//! scheduling, remote push) is spawned onto the Tokio runtime through the
//! handle the runner was given, so a pending permission prompt or a delayed
//! push never blocks drawing.

// Rust guideline compliant 2026-02

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use anyhow::Result;
use crossterm::event::{self, Event, KeyEvent, KeyEventKind};
use ratatui::{backend::Backend, Terminal};
use tokio::runtime::Handle;
use tokio::sync::mpsc;

use crate::app::{self, App, InputAction, UiRequest};
use crate::constants::TUI_FRAME_DELAY;
use crate::controller::LifecycleController;
use crate::notifications::LocalNotificationService;

/// Owns the terminal and the UI state for one session.
pub struct TuiRunner<B: Backend> {
    terminal: Terminal<B>,
    controller: Arc<LifecycleController>,
    service: Arc<LocalNotificationService>,
    app: App,
    requests: mpsc::UnboundedReceiver<UiRequest>,
    runtime: Handle,
    shutdown: Arc<AtomicBool>,
    quit: bool,
}

impl<B: Backend> std::fmt::Debug for TuiRunner<B> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TuiRunner")
            .field("app", &self.app)
            .field("controller", &self.controller)
            .field("quit", &self.quit)
            .finish_non_exhaustive()
    }
}

impl<B> TuiRunner<B>
where
    B: Backend,
    B::Error: std::error::Error + Send + Sync + 'static,
{
    /// Creates a runner. Nothing happens until [`Self::run`].
    pub fn new(
        terminal: Terminal<B>,
        controller: Arc<LifecycleController>,
        service: Arc<LocalNotificationService>,
        requests: mpsc::UnboundedReceiver<UiRequest>,
        runtime: Handle,
        shutdown: Arc<AtomicBool>,
    ) -> Self {
        let mut app = App::new();
        app.set_foreground(service.is_foreground());
        Self {
            terminal,
            controller,
            service,
            app,
            requests,
            runtime,
            shutdown,
            quit: false,
        }
    }

    /// UI state.
    pub fn app(&self) -> &App {
        &self.app
    }

    /// Whether the user asked to quit.
    pub fn should_quit(&self) -> bool {
        self.quit || self.shutdown.load(Ordering::Relaxed)
    }

    /// Mounts the controller and runs until quit or shutdown.
    ///
    /// Listeners are released on every exit path, including errors.
    pub fn run(&mut self) -> Result<()> {
        let controller = Arc::clone(&self.controller);
        self.runtime.spawn(async move {
            controller.mount().await;
        });
        let _unmount = scopeguard::guard(Arc::clone(&self.controller), |controller| {
            controller.unmount();
        });

        while !self.should_quit() {
            self.drain_requests();
            self.draw()?;

            if event::poll(TUI_FRAME_DELAY)? {
                if let Event::Key(key) = event::read()? {
                    if key.kind == KeyEventKind::Press {
                        self.handle_key(key);
                    }
                }
            }
        }

        log::info!("[Tui] Exiting");
        Ok(())
    }

    /// Moves pending alert/prompt requests into the UI state.
    pub fn drain_requests(&mut self) {
        while let Ok(request) = self.requests.try_recv() {
            self.app.push_request(request);
        }
    }

    /// Draws one frame.
    pub fn draw(&mut self) -> Result<()> {
        let screen = self.controller.snapshot();
        let app = &self.app;
        self.terminal.draw(|frame| app::render(frame, &screen, app))?;
        Ok(())
    }

    /// Handles one key press.
    pub fn handle_key(&mut self, key: KeyEvent) {
        let action = app::handle_key(self.app.mode(), key.code, key.modifiers);
        self.handle_action(action);
    }

    /// Applies an input action.
    pub fn handle_action(&mut self, action: InputAction) {
        match action {
            InputAction::None => {}
            InputAction::Quit => self.quit = true,
            InputAction::ScheduleLocal => {
                let controller = Arc::clone(&self.controller);
                self.runtime.spawn(async move {
                    if let Err(e) = controller.schedule_local().await {
                        log::error!("[Tui] Local notification failed: {e}");
                    }
                });
                self.app.set_status("Local notification scheduled");
            }
            InputAction::SendRemote => {
                // send_remote spawns its own task and needs the runtime context.
                let _enter = self.runtime.enter();
                drop(self.controller.send_remote());
                self.app.set_status("Remote notification on its way");
            }
            InputAction::ToggleForeground => {
                let foreground = self.app.toggle_foreground();
                self.service.set_foreground(foreground);
            }
            InputAction::TapNotification => {
                if self.service.tap_last_delivered() {
                    self.app.set_foreground(true);
                    self.app.set_status("Opened last notification");
                } else {
                    self.app.set_status("No notification delivered yet");
                }
            }
            InputAction::DismissAlert => self.app.dismiss_alert(),
            InputAction::AnswerPrompt(granted) => self.app.answer_prompt(granted),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::app::AppMode;
    use crate::controller::ControllerParts;
    use crate::error::NotifyError;
    use crate::notifications::{
        DeviceInfo, NotificationCenter, NotificationService, PermissionStatus, Platform,
        PushMessage, PushRelay,
    };
    use crate::tui::bridge::{ui_channel, TuiAlerter, TuiPrompt};
    use async_trait::async_trait;
    use crossterm::event::{KeyCode, KeyModifiers};
    use ratatui::backend::TestBackend;
    use std::sync::Mutex;
    use std::time::Duration;

    #[derive(Default)]
    struct RecordingRelay(Mutex<Vec<PushMessage>>);

    #[async_trait]
    impl PushRelay for RecordingRelay {
        async fn send(&self, message: &PushMessage) -> Result<(), NotifyError> {
            self.0.lock().unwrap().push(message.clone());
            Ok(())
        }
    }

    struct Harness {
        runner: TuiRunner<TestBackend>,
        service: Arc<LocalNotificationService>,
        relay: Arc<RecordingRelay>,
    }

    fn harness(permission: PermissionStatus) -> Harness {
        let (tx, rx) = ui_channel();
        let center = NotificationCenter::new();
        let service = Arc::new(
            LocalNotificationService::new(Arc::clone(&center), Arc::new(TuiPrompt::new(tx.clone())))
                .with_permission(permission),
        );
        let relay = Arc::new(RecordingRelay::default());
        let controller = Arc::new(LifecycleController::new(ControllerParts {
            service: Arc::clone(&service) as Arc<dyn NotificationService>,
            center,
            relay: Arc::clone(&relay) as Arc<dyn PushRelay>,
            alerter: Arc::new(TuiAlerter::new(tx)),
            device: DeviceInfo {
                is_device: true,
                platform: Platform::Other,
            },
            project_id: "project".to_string(),
            local_delay: Duration::from_secs(2),
            remote_delay: Duration::from_secs(3),
        }));
        let terminal = Terminal::new(TestBackend::new(100, 24)).expect("terminal");
        let runner = TuiRunner::new(
            terminal,
            controller,
            Arc::clone(&service),
            rx,
            Handle::current(),
            Arc::new(AtomicBool::new(false)),
        );
        Harness {
            runner,
            service,
            relay,
        }
    }

    fn press(runner: &mut TuiRunner<TestBackend>, c: char) {
        runner.handle_key(KeyEvent::new(KeyCode::Char(c), KeyModifiers::NONE));
    }

    #[tokio::test]
    async fn test_permission_prompt_flow() {
        let mut h = harness(PermissionStatus::Undetermined);
        let controller = Arc::clone(&h.runner.controller);
        let mount = tokio::spawn(async move { controller.mount().await });

        // Wait for the prompt request to arrive.
        for _ in 0..100 {
            h.runner.drain_requests();
            if h.runner.app().mode() == &AppMode::PermissionPrompt {
                break;
            }
            tokio::time::sleep(Duration::from_millis(5)).await;
        }
        assert_eq!(h.runner.app().mode(), &AppMode::PermissionPrompt);

        press(&mut h.runner, 'y');
        let token = mount.await.expect("task").expect("token");
        assert!(token.as_str().starts_with("ExponentPushToken["));
        h.runner.draw().expect("draw");
    }

    #[tokio::test(start_paused = true)]
    async fn test_local_notification_shows_on_screen() {
        let mut h = harness(PermissionStatus::Granted);
        h.runner.controller.mount().await;

        press(&mut h.runner, 'l');
        tokio::time::sleep(Duration::from_millis(2100)).await;

        let screen = h.runner.controller.snapshot();
        assert_eq!(screen.title.as_deref(), Some("You've got mail! 📬"));
        h.runner.draw().expect("draw");
    }

    #[tokio::test(start_paused = true)]
    async fn test_remote_press_sends_after_delay() {
        let mut h = harness(PermissionStatus::Granted);
        h.runner.controller.mount().await;

        press(&mut h.runner, 'r');
        press(&mut h.runner, 'b');
        assert!(!h.service.is_foreground());

        tokio::time::sleep(Duration::from_millis(2900)).await;
        assert!(h.relay.0.lock().unwrap().is_empty());
        tokio::time::sleep(Duration::from_millis(200)).await;
        assert_eq!(h.relay.0.lock().unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_quit() {
        let mut h = harness(PermissionStatus::Granted);
        assert!(!h.runner.should_quit());
        press(&mut h.runner, 'q');
        assert!(h.runner.should_quit());
    }

    #[tokio::test]
    async fn test_tap_without_delivery() {
        let mut h = harness(PermissionStatus::Granted);
        press(&mut h.runner, 't');
        assert_eq!(h.runner.app().status(), Some("No notification delivered yet"));
    }
}
