//! Consumer key validator
//!
//! Requests a consumer key scoped to the calls the deploy tools make. The key
//! is inactive until the account owner opens the validation URL and logs in;
//! activation is not polled.

use crate::error::DeployError;
use ovh_client::{AccessMethod, AccessRule, CredentialRequest, OvhClientTrait};
use std::io::Write;
use std::process::{Command, Stdio};
use tracing::{debug, info};

/// Access rules granted to the deploy tools
pub fn access_rules() -> Vec<AccessRule> {
    vec![
        AccessRule::new(AccessMethod::Get, "/me"),
        AccessRule::new(AccessMethod::Get, "/dedicated/server"),
        AccessRule::new(AccessMethod::Get, "/dedicated/server/*"),
        AccessRule::new(AccessMethod::Put, "/dedicated/server/*"),
        AccessRule::new(AccessMethod::Post, "/dedicated/server/*/reboot"),
        AccessRule::new(AccessMethod::Get, "/dedicated/server/*/boot"),
        AccessRule::new(AccessMethod::Put, "/dedicated/server/*/boot"),
        AccessRule::new(AccessMethod::Get, "/dedicated/server/*/task"),
    ]
}

/// Request a new consumer key and print what the operator must do with it
pub async fn request_consumer_key<W: Write>(
    client: &dyn OvhClientTrait,
    out: &mut W,
) -> Result<CredentialRequest, DeployError> {
    let rules = access_rules();
    writeln!(out, "🔑 Requesting consumer key with {} access rules:", rules.len())?;
    for rule in &rules {
        writeln!(out, "   {:<5} {}", rule.method.to_string(), rule.path)?;
    }

    let request = client.request_consumer_key(&rules, None).await?;
    info!("Consumer key requested, state {:?}", request.state);
    Ok(request)
}

/// Try to open `url` in the local browser
///
/// Returns whether a browser launcher could be started.
pub fn open_in_browser(url: &str) -> bool {
    let mut command = if cfg!(target_os = "macos") {
        let mut command = Command::new("open");
        command.arg(url);
        command
    } else if cfg!(target_os = "windows") {
        let mut command = Command::new("cmd");
        command.args(["/C", "start", "", url]);
        command
    } else {
        let mut command = Command::new("xdg-open");
        command.arg(url);
        command
    };

    match command.stdout(Stdio::null()).stderr(Stdio::null()).spawn() {
        Ok(_) => true,
        Err(e) => {
            debug!("Could not launch a browser: {}", e);
            false
        }
    }
}

/// Print the validation URL and the activation steps
pub fn print_validation_steps<W: Write>(
    out: &mut W,
    request: &CredentialRequest,
    browser_opened: bool,
) -> std::io::Result<()> {
    writeln!(out, "\n✅ Consumer key created: {}", request.consumer_key)?;
    if browser_opened {
        writeln!(out, "🌐 Opened the validation page in your browser:")?;
    } else {
        writeln!(out, "🌐 Open this URL to activate the key:")?;
    }
    writeln!(out, "   {}", request.validation_url)?;

    writeln!(out, "\n📝 Next steps:")?;
    writeln!(out, "   1. Log in with your OVHcloud account on the validation page")?;
    writeln!(out, "   2. Pick a validity period (Unlimited is fine for a lab)")?;
    writeln!(out, "   3. Put the consumer key in ovh.conf as shown below")?;
    writeln!(out, "   4. Run ovh-api-test to check the new key")
}

/// Print the `ovh.conf` section with the new key
///
/// The application secret is never echoed.
pub fn print_config_snippet<W: Write>(
    out: &mut W,
    endpoint: &str,
    application_key: &str,
    consumer_key: &str,
) -> std::io::Result<()> {
    writeln!(out, "\n📄 ovh.conf:")?;
    writeln!(out, "[default]")?;
    writeln!(out, "endpoint={}", endpoint)?;
    writeln!(out)?;
    writeln!(out, "[{}]", endpoint)?;
    writeln!(out, "application_key={}", application_key)?;
    writeln!(out, "application_secret=<your application secret>")?;
    writeln!(out, "consumer_key={}", consumer_key)
}
