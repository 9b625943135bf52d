use crate::bulk::{BulkProgress, ProgressListener};
use crate::ui::icons::{CHECK, CROSS};
use console::style;
use indicatif::{ProgressBar, ProgressDrawTarget, ProgressStyle};

/// Terminal progress bar for a running batch, rendered via `indicatif`.
///
/// Shows `label [bar] current/total percent%`. The bar is hidden until a
/// batch starts and cleared when it ends, mirroring the progress record
/// being reset to zero.
pub struct BulkProgressUI {
    bar: ProgressBar,
}

impl BulkProgressUI {
    pub fn new() -> Self {
        let style = ProgressStyle::default_bar()
            .template("{prefix:.bold.dim} [{bar:40.cyan/blue}] {pos}/{len} {msg}")
            .expect("progress bar template is a valid static string")
            .progress_chars("█▓▒░");

        let bar = ProgressBar::with_draw_target(Some(0), ProgressDrawTarget::stderr());
        bar.set_style(style);
        Self { bar }
    }

    /// A bar that never draws; used when stderr is not a terminal.
    pub fn hidden() -> Self {
        Self {
            bar: ProgressBar::hidden(),
        }
    }

    /// Print a line above the bar, falling back to `eprintln!`.
    pub fn print_line(&self, msg: impl AsRef<str>) {
        if self.bar.is_hidden() {
            eprintln!("{}", msg.as_ref());
        } else {
            self.bar.println(msg.as_ref());
        }
    }
}

impl Default for BulkProgressUI {
    fn default() -> Self {
        Self::new()
    }
}

impl ProgressListener for BulkProgressUI {
    fn started(&self, progress: &BulkProgress) {
        self.bar.reset();
        self.bar.set_length(progress.total as u64);
        self.bar.set_position(0);
        self.bar.set_prefix(progress.label.clone());
        self.bar.set_message(format!("{}%", progress.percent()));
    }

    fn advanced(&self, progress: &BulkProgress) {
        self.bar.set_position(progress.current as u64);
        self.bar
            .set_message(format!("{}%", style(progress.percent()).cyan()));
    }

    fn finished(&self, succeeded: bool) {
        let prefix = self.bar.prefix();
        let done = self.bar.position();
        let total = self.bar.length().unwrap_or(0);
        self.bar.finish_and_clear();
        if succeeded {
            self.print_line(format!(
                "{} {} {}/{} done",
                CHECK,
                prefix,
                style(done).green(),
                total
            ));
        } else {
            self.print_line(format!(
                "{} {} stopped at {}/{}",
                CROSS,
                prefix,
                style(done).red(),
                total
            ));
        }
    }
}
