// 节点完成进度显示
use indicatif::{ProgressBar, ProgressStyle};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

#[derive(Clone)]
pub struct CastProgress {
    progress_bar: ProgressBar,
    answered: Arc<AtomicU64>,
    total: u64,
}

impl CastProgress {
    pub fn new(total: usize, visible: bool) -> Self {
        let total = total as u64;
        let progress_bar = if visible {
            ProgressBar::new(total)
        } else {
            ProgressBar::hidden()
        };
        if let Ok(style) = ProgressStyle::default_bar()
            .template("{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} nodes {msg}")
        {
            progress_bar.set_style(style.progress_chars("#>-"));
        }

        Self {
            progress_bar,
            answered: Arc::new(AtomicU64::new(0)),
            total,
        }
    }

    pub fn node_done(&self, host: &str, answered: bool) {
        if answered {
            self.answered.fetch_add(1, Ordering::Relaxed);
            self.progress_bar.set_message(host.to_string());
        } else {
            self.progress_bar.set_message(format!("{} (failed)", host));
        }
        self.progress_bar.inc(1);
    }

    pub fn answered(&self) -> u64 {
        self.answered.load(Ordering::Relaxed)
    }

    pub fn finish(&self) {
        self.progress_bar.finish_with_message(format!(
            "{} of {} answered",
            self.answered(),
            self.total
        ));
    }
}
