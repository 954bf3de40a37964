use indicatif::{ProgressBar, ProgressDrawTarget, ProgressStyle};

use super::styling::{done, heading, highlight};

/// Progress tracking for the two collection phases
pub struct PhaseProgress {
    pb: ProgressBar,
}

impl PhaseProgress {
    pub fn start_phase_1(max_pages: usize) -> Self {
        eprintln!("{}  {}", heading("⚙️"), heading("Phases").underlined());
        let pb = create_spinner(
            highlight(format!(
                "Phase 1/2: Fetching workflow runs and jobs (up to {max_pages} pages)"
            ))
            .to_string(),
        );
        Self { pb }
    }

    pub fn finish_phase_1_start_phase_2(self, runs: usize, jobs: usize) -> Self {
        self.pb.finish_with_message(
            done(format!("Phase 1/2: Fetched {jobs} jobs from {runs} runs ✓"))
                .to_string(),
        );
        let pb = create_spinner(highlight("Phase 2/2: Computing statistics").to_string());
        Self { pb }
    }

    pub fn finish_phase_2(self) {
        self.pb
            .finish_with_message(done("Phase 2/2: Statistics computed ✓").to_string());
        eprintln!();
    }
}

fn create_spinner(message: String) -> ProgressBar {
    let pb = ProgressBar::new_spinner();
    pb.set_draw_target(ProgressDrawTarget::stderr());
    pb.set_style(
        ProgressStyle::default_spinner()
            .template("  {msg} {spinner}")
            .unwrap(),
    );
    pb.set_message(message);
    pb.enable_steady_tick(std::time::Duration::from_millis(100));
    pb
}
