//! Interactive driver
//!
//! Prompt sequence run before anything is changed on the server: pick a
//! server, optionally override the configuration URL, pick a stage (two-stage
//! variant only) and confirm. Invalid answers are hard errors; there is no
//! re-prompt. Reaching end of input at any prompt cancels the deployment.

use crate::error::DeployError;
use ipxe_script::BootTarget;
use std::io::{BufRead, Write};

/// Which deploy entry point is running
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeployVariant {
    /// Partition and install in one boot
    SingleStage,
    /// RAID preparation and installation as two separate runs
    TwoStage,
}

/// Everything needed to run a deployment
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeploymentPlan {
    /// Server identifier as listed by the API
    pub server: String,
    /// `None` means the target's default configuration URL
    pub config_url: Option<String>,
    /// Boot the generated script is for
    pub target: BootTarget,
}

/// Result of the prompt sequence
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PromptOutcome {
    /// The operator confirmed
    Proceed(DeploymentPlan),
    /// The operator declined or input ended
    Cancelled,
}

/// Resolve a menu answer to a server identifier
///
/// All-digit answers are 1-based indexes; anything else must match an
/// identifier exactly.
pub fn resolve_selection(choice: &str, servers: &[String]) -> Result<String, DeployError> {
    let choice = choice.trim();

    if !choice.is_empty() && choice.chars().all(|c| c.is_ascii_digit()) {
        return choice
            .parse::<usize>()
            .ok()
            .and_then(|n| n.checked_sub(1))
            .and_then(|idx| servers.get(idx))
            .cloned()
            .ok_or_else(|| DeployError::InvalidSelection(format!("Invalid server number: {}", choice)));
    }

    servers
        .iter()
        .find(|name| name.as_str() == choice)
        .cloned()
        .ok_or_else(|| DeployError::InvalidSelection(format!("Server '{}' not found", choice)))
}

/// Parse the stage answer of the two-stage variant
pub fn parse_stage(choice: &str) -> Result<BootTarget, DeployError> {
    match choice.trim() {
        "1" => Ok(BootTarget::RaidPreparation),
        "2" => Ok(BootTarget::PlatformInstall),
        other => Err(DeployError::InvalidStage(other.to_string())),
    }
}

/// Only `yes`, in any case and with surrounding whitespace, confirms
pub fn is_confirmed(answer: &str) -> bool {
    answer.trim().eq_ignore_ascii_case("yes")
}

/// Print `question` and read one line; `None` at end of input
fn prompt<R: BufRead, W: Write>(input: &mut R, out: &mut W, question: &str) -> std::io::Result<Option<String>> {
    write!(out, "{}", question)?;
    out.flush()?;

    let mut line = String::new();
    if input.read_line(&mut line)? == 0 {
        return Ok(None);
    }
    Ok(Some(line.trim().to_string()))
}

fn cancelled<W: Write>(out: &mut W) -> Result<PromptOutcome, DeployError> {
    writeln!(out, "\n👋 Deployment cancelled")?;
    Ok(PromptOutcome::Cancelled)
}

/// Print the summary of what confirming will do
pub fn print_confirmation<W: Write>(out: &mut W, plan: &DeploymentPlan) -> std::io::Result<()> {
    writeln!(out, "\n⚠️  About to deploy Harvester on: {}", plan.server)?;
    writeln!(out, "   Boot target: {}", plan.target.description())?;
    writeln!(
        out,
        "   Config URL: {}",
        plan.config_url
            .clone()
            .unwrap_or_else(|| format!("{} (default)", plan.target.default_config_url()))
    )?;
    match plan.target {
        BootTarget::RaidPreparation => {
            writeln!(out, "   This will reboot the server and rebuild its RAID array")?;
            writeln!(out, "   All data on the server's disks will be lost")?;
        }
        BootTarget::SingleStage | BootTarget::PlatformInstall => {
            writeln!(out, "   This will reboot the server and install Harvester HCI")?;
            writeln!(out, "   The current operating system will be replaced")?;
        }
    }
    Ok(())
}

/// Run the prompt sequence against `servers`
///
/// Returns an error for an invalid selection or stage, `Cancelled` when the
/// operator does not answer `yes`.
pub fn collect_plan<R: BufRead, W: Write>(
    input: &mut R,
    out: &mut W,
    servers: &[String],
    variant: DeployVariant,
) -> Result<PromptOutcome, DeployError> {
    writeln!(out, "\n🎯 Select server for deployment:")?;
    let Some(choice) = prompt(input, out, "Enter server name or number: ")? else {
        return cancelled(out);
    };
    let server = resolve_selection(&choice, servers)?;

    writeln!(out, "\n🔧 Configuration options:")?;
    let Some(custom_url) = prompt(input, out, "Custom cloud-init URL (press Enter for default): ")? else {
        return cancelled(out);
    };
    let config_url = Some(custom_url).filter(|url| !url.is_empty());

    let target = match variant {
        DeployVariant::SingleStage => BootTarget::SingleStage,
        DeployVariant::TwoStage => {
            writeln!(out, "\n📦 Deployment stage:")?;
            writeln!(out, "   1. {}", BootTarget::RaidPreparation.description())?;
            writeln!(out, "   2. {}", BootTarget::PlatformInstall.description())?;
            let Some(stage) = prompt(input, out, "Enter stage (1 or 2): ")? else {
                return cancelled(out);
            };
            parse_stage(&stage)?
        }
    };

    let plan = DeploymentPlan {
        server,
        config_url,
        target,
    };
    print_confirmation(out, &plan)?;

    match prompt(input, out, "Continue? (yes/no): ")? {
        Some(answer) if is_confirmed(&answer) => Ok(PromptOutcome::Proceed(plan)),
        Some(_) => {
            writeln!(out, "👋 Deployment cancelled")?;
            Ok(PromptOutcome::Cancelled)
        }
        None => cancelled(out),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    fn servers() -> Vec<String> {
        vec!["srvA".to_string(), "srvB".to_string(), "srvC".to_string()]
    }

    fn run(answers: &str, variant: DeployVariant) -> Result<PromptOutcome, DeployError> {
        let mut input = Cursor::new(answers.as_bytes().to_vec());
        let mut out = Vec::new();
        collect_plan(&mut input, &mut out, &servers(), variant)
    }

    #[test]
    fn test_selection_by_index() {
        assert_eq!(resolve_selection("2", &servers()).unwrap(), "srvB");
        assert_eq!(resolve_selection(" 1 ", &servers()).unwrap(), "srvA");
    }

    #[test]
    fn test_selection_by_name() {
        assert_eq!(resolve_selection("srvC", &servers()).unwrap(), "srvC");
    }

    #[test]
    fn test_selection_errors() {
        for choice in ["9", "0", "srvZ", "", "99999999999999999999999"] {
            assert!(
                matches!(resolve_selection(choice, &servers()), Err(DeployError::InvalidSelection(_))),
                "choice {:?} should be rejected",
                choice
            );
        }
    }

    #[test]
    fn test_parse_stage() {
        assert_eq!(parse_stage("1").unwrap(), BootTarget::RaidPreparation);
        assert_eq!(parse_stage(" 2\n").unwrap(), BootTarget::PlatformInstall);
        assert!(matches!(parse_stage("3"), Err(DeployError::InvalidStage(_))));
        assert!(matches!(parse_stage("one"), Err(DeployError::InvalidStage(_))));
    }

    #[test]
    fn test_confirmation_gate() {
        assert!(is_confirmed("yes"));
        assert!(is_confirmed("YES"));
        assert!(is_confirmed("  Yes \n"));
        for answer in ["y", "no", "", "yes please", "ye s"] {
            assert!(!is_confirmed(answer), "{:?} must not confirm", answer);
        }
    }

    #[test]
    fn test_single_stage_plan() {
        let outcome = run("srvB\n\nyes\n", DeployVariant::SingleStage).unwrap();
        assert_eq!(
            outcome,
            PromptOutcome::Proceed(DeploymentPlan {
                server: "srvB".to_string(),
                config_url: None,
                target: BootTarget::SingleStage,
            })
        );
    }

    #[test]
    fn test_two_stage_plan_with_override() {
        let outcome = run("3\nhttps://example.test/cfg.yaml\n2\nYES\n", DeployVariant::TwoStage).unwrap();
        assert_eq!(
            outcome,
            PromptOutcome::Proceed(DeploymentPlan {
                server: "srvC".to_string(),
                config_url: Some("https://example.test/cfg.yaml".to_string()),
                target: BootTarget::PlatformInstall,
            })
        );
    }

    #[test]
    fn test_declined_confirmation_cancels() {
        assert_eq!(run("1\n\nno\n", DeployVariant::SingleStage).unwrap(), PromptOutcome::Cancelled);
        assert_eq!(run("1\n\n1\ny\n", DeployVariant::TwoStage).unwrap(), PromptOutcome::Cancelled);
    }

    #[test]
    fn test_end_of_input_cancels() {
        assert_eq!(run("", DeployVariant::SingleStage).unwrap(), PromptOutcome::Cancelled);
        assert_eq!(run("1\n\n", DeployVariant::TwoStage).unwrap(), PromptOutcome::Cancelled);
    }

    #[test]
    fn test_invalid_answers_are_hard_errors() {
        assert!(matches!(
            run("9\n\nyes\n", DeployVariant::SingleStage),
            Err(DeployError::InvalidSelection(_))
        ));
        assert!(matches!(
            run("1\n\n3\nyes\n", DeployVariant::TwoStage),
            Err(DeployError::InvalidStage(_))
        ));
    }

    #[test]
    fn test_confirmation_summary_mentions_data_loss_for_stage_one() {
        let plan = DeploymentPlan {
            server: "srvA".to_string(),
            config_url: None,
            target: BootTarget::RaidPreparation,
        };
        let mut out = Vec::new();
        print_confirmation(&mut out, &plan).unwrap();
        let text = String::from_utf8(out).unwrap();
        assert!(text.contains("About to deploy Harvester on: srvA"));
        assert!(text.contains("All data"));
        assert!(text.contains("(default)"));
    }
}
