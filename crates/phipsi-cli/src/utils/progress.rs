use indicatif::{ProgressBar, ProgressDrawTarget, ProgressStyle};
use phipsi::engine::progress::{Progress, ProgressCallback};
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

const SPINNER_TICK_MS: u64 = 80;

/// Renders workflow progress events on stderr: a spinner per phase, a bar while a phase
/// walks over segments.
#[derive(Clone)]
pub struct CliProgressHandler {
    pb: ProgressBar,
    phases_started: Arc<AtomicUsize>,
}

impl CliProgressHandler {
    pub fn new() -> Self {
        let pb = ProgressBar::with_draw_target(Some(0), ProgressDrawTarget::stderr())
            .with_style(Self::spinner_style());
        pb.finish_and_clear();

        Self {
            pb,
            phases_started: Arc::new(AtomicUsize::new(0)),
        }
    }

    pub fn get_callback(&self) -> ProgressCallback<'static> {
        let pb = self.pb.clone();
        let phases_started = Arc::clone(&self.phases_started);

        Box::new(move |progress: Progress| match progress {
            Progress::PhaseStart { name } => {
                let phase = phases_started.fetch_add(1, Ordering::Relaxed) + 1;
                pb.reset();
                pb.set_length(0);
                pb.set_style(Self::spinner_style());
                pb.set_prefix(format!("[{}]", phase));
                pb.set_message(name);
                pb.enable_steady_tick(Duration::from_millis(SPINNER_TICK_MS));
            }
            Progress::PhaseFinish => {
                pb.disable_steady_tick();
                pb.finish_with_message("✓ Done");
            }
            Progress::TaskStart { total_steps } => {
                pb.disable_steady_tick();
                pb.set_style(Self::bar_style());
                pb.set_length(total_steps);
                pb.set_position(0);
            }
            Progress::TaskIncrement => pb.inc(1),
            Progress::TaskFinish => {
                if let Some(length) = pb.length() {
                    pb.set_position(length);
                }
            }
            Progress::Message(msg) => pb.println(format!("  {}", msg)),
        })
    }

    fn spinner_style() -> ProgressStyle {
        ProgressStyle::with_template("{prefix:.bold.dim} {spinner:.green} {msg}")
            .unwrap_or_else(|_| ProgressStyle::default_spinner())
    }

    fn bar_style() -> ProgressStyle {
        ProgressStyle::with_template("{prefix:.bold.dim} {msg:<20} [{bar:40.cyan/blue}] {pos}/{len}")
            .unwrap_or_else(|_| ProgressStyle::default_bar())
            .progress_chars("##-")
    }
}

impl Default for CliProgressHandler {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::thread;

    #[test]
    fn handler_initializes_in_a_clean_state() {
        let handler = CliProgressHandler::new();
        assert_eq!(handler.pb.length(), Some(0));
        assert!(handler.pb.is_finished());
    }

    #[test]
    fn callback_tracks_phases_and_segments() {
        let handler = CliProgressHandler::new();
        let callback = handler.get_callback();

        callback(Progress::PhaseStart {
            name: "Resolving Targets",
        });
        assert_eq!(handler.pb.message(), "Resolving Targets");
        assert_eq!(handler.pb.prefix(), "[1]");
        assert!(!handler.pb.is_finished());
        callback(Progress::PhaseFinish);
        assert_eq!(handler.pb.message(), "✓ Done");

        callback(Progress::PhaseStart {
            name: "Computing Torsions",
        });
        assert_eq!(handler.pb.prefix(), "[2]");
        callback(Progress::TaskStart { total_steps: 3 });
        assert_eq!(handler.pb.length(), Some(3));
        assert_eq!(handler.pb.position(), 0);

        callback(Progress::TaskIncrement);
        assert_eq!(handler.pb.position(), 1);

        callback(Progress::TaskFinish);
        assert_eq!(handler.pb.position(), 3);

        callback(Progress::PhaseFinish);
        assert!(handler.pb.is_finished());
    }

    #[test]
    fn callback_is_thread_safe() {
        let handler = CliProgressHandler::new();
        let callback = handler.get_callback();

        thread::spawn(move || {
            callback(Progress::PhaseStart {
                name: "Segmenting Chains",
            });
            callback(Progress::Message("chain B skipped".to_string()));
            callback(Progress::PhaseFinish);
        })
        .join()
        .unwrap();

        assert!(handler.pb.is_finished());
        assert_eq!(handler.pb.message(), "✓ Done");
    }
}
