//! Console progress reporter for council runs.

use colored::Colorize;
use council_application::CouncilProgress;
use council_domain::{FinalSelection, Stage1Result, Stage2Result, StagePhase};

/// Prints stage-boundary events to stderr as the run progresses
pub struct ConsoleProgress;

impl CouncilProgress for ConsoleProgress {
    fn on_stage_start(&self, stage: StagePhase) {
        eprintln!("{} {}", ">>".cyan().bold(), stage.display_name().bold());
    }

    fn on_stage1_complete(&self, results: &[Stage1Result]) {
        for result in results {
            eprintln!(
                "   {} draft from {}",
                "+".green(),
                result.backend.to_string().bold()
            );
        }
    }

    fn on_stage2_complete(&self, results: &[Stage2Result]) {
        for result in results {
            if result.is_pass_through() {
                eprintln!(
                    "   {} {} could not refine {} (original kept)",
                    "!".yellow(),
                    result.refiner,
                    result.origin
                );
            } else {
                eprintln!("   {} {} refined {}", "+".green(), result.refiner, result.origin);
            }
        }
    }

    fn on_stage3_complete(&self, selection: &FinalSelection) {
        if let Some(reason) = &selection.fallback {
            eprintln!("   {} fallback selection: {}", "!".yellow(), reason);
        } else {
            eprintln!(
                "   {} winner from {}",
                "*".green().bold(),
                selection.backend.to_string().bold()
            );
        }
    }

    fn on_error(&self, message: &str) {
        eprintln!("{} {}", "error:".red().bold(), message);
    }
}
