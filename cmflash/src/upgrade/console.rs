//! Firmware upgrade through the device's serial console.
//!
//! Used for RDK-B gateways (F5685) whose download parameters are set with
//! `dmcli` from a root shell. Progress is judged from the console stream:
//! the kernel prints a reboot banner once the image is flashed, and a login
//! prompt once the new image has booted.

use log::{debug, error, info, warn};

use super::UpgradeOutcome;
use super::settings::ConsoleUpgradeSettings;
use crate::console::{ConsoleSession, ExpectOutcome};

/// Kernel banner printed when the device starts rebooting.
pub const REBOOT_MARKER: &str = "reboot: Restarting system";

/// Marker of the console login prompt.
pub const LOGIN_MARKER: &str = "login:";

/// Keystroke sent to make the console reprint its prompt.
const WAKE_KEYSTROKE: &str = "\r";

const DM_PREFIX: &str = "dmcli eRT setv Device.DeviceInfo.X_RDKCENTRAL-COM_";

/// `dmcli` command setting the download server URL.
pub fn download_url_command(url: &str) -> String {
    format!("{}FirmwareDownloadURL string {}", DM_PREFIX, url)
}

/// `dmcli` command setting the firmware file to download.
pub fn firmware_name_command(target_fw: &str) -> String {
    format!("{}FirmwareToDownload string \"{}\"", DM_PREFIX, target_fw)
}

/// `dmcli` command starting the download.
pub fn trigger_command() -> String {
    format!("{}FirmwareDownloadNow bool true", DM_PREFIX)
}

/// Console upgrade orchestrator.
///
/// Owns the session for the duration of [`run`](Self::run); once connected,
/// the session is closed on every exit path.
pub struct ConsoleUpgrade<S> {
    session: S,
    settings: ConsoleUpgradeSettings,
}

impl<S: ConsoleSession> ConsoleUpgrade<S> {
    /// Create an orchestrator over an unopened session.
    pub fn new(session: S, settings: ConsoleUpgradeSettings) -> Self {
        Self { session, settings }
    }

    /// Get the session.
    pub fn session(&self) -> &S {
        &self.session
    }

    /// Consume the orchestrator and return the session.
    pub fn into_session(self) -> S {
        self.session
    }

    /// Upgrade the device to `target_fw`, a file name in the server's
    /// download folder.
    pub async fn run(&mut self, target_fw: &str) -> UpgradeOutcome {
        if let Err(e) = self.session.connect().await {
            error!("Unable to open console connection to bridge, aborting firmware upgrade...");
            debug!("Connect error: {}", e);
            return UpgradeOutcome::Indeterminate;
        }

        let outcome = self.drive(target_fw).await;

        self.session.set_timeout(self.settings.restored_timeout);
        if let Err(e) = self.session.close().await {
            warn!("Error closing console session: {}", e);
        }

        outcome
    }

    async fn drive(&mut self, target_fw: &str) -> UpgradeOutcome {
        self.configure(target_fw).await;

        let reboot_wait = self.settings.reboot_wait;
        info!("Waiting for reboot message in console (max {}s)", reboot_wait.as_secs());
        self.session.set_timeout(reboot_wait);

        let reboot = self.session.expect(REBOOT_MARKER).await;
        if !reboot.is_found() {
            error!("No reboot detected, failed to change FW");
            debug!("Reboot wait ended with {:?}", reboot);
            return UpgradeOutcome::Indeterminate;
        }

        let settle = self.settings.reboot_settle;
        info!("DUT reboot initiated, waiting {}s before checks", settle.as_secs());
        tokio::time::sleep(settle).await;

        if !self.wait_for_login().await {
            error!("Prompt not detected after reboot, possible failure while changing FW");
            return UpgradeOutcome::Indeterminate;
        }

        info!("Upgrade completed");
        UpgradeOutcome::Succeeded
    }

    /// Write the download parameters and trigger the download.
    ///
    /// A write without a prompt back is logged and skipped: on this console
    /// a missing response does not mean the setting was not applied.
    async fn configure(&mut self, target_fw: &str) {
        let steps = [
            (
                format!("Setting DL server address to '{}'", self.settings.download_url),
                download_url_command(&self.settings.download_url),
                "Error setting DL server address",
                true,
            ),
            (
                format!("Setting FW filename to {}", target_fw),
                firmware_name_command(target_fw),
                "Error setting FW filename",
                true,
            ),
            (
                "Triggering FW download".to_string(),
                trigger_command(),
                "Error triggering FW download",
                false,
            ),
        ];

        for (progress, command, failure, settle) in steps {
            info!("{}", progress);
            if let Err(e) = self.session.execute(&command).await {
                error!("{}", failure);
                debug!("Command {:?} failed: {}", command, e);
            }
            if settle {
                tokio::time::sleep(self.settings.write_settle).await;
            }
        }
    }

    /// Probe for the login prompt within the retry budget.
    async fn wait_for_login(&mut self) -> bool {
        info!("Checking if AP online...");
        self.session.set_timeout(self.settings.prompt_timeout);

        let retry = self.settings.prompt_retry;
        for _ in retry.attempts() {
            let outcome = match self.session.send_raw(WAKE_KEYSTROKE).await {
                Ok(()) => self.session.expect(LOGIN_MARKER).await,
                Err(e) => {
                    debug!("Sending keystroke failed: {}", e);
                    ExpectOutcome::ConnectionLost
                }
            };

            if outcome.is_found() {
                info!("DUT back online");
                return true;
            }

            info!("Prompt not detected, retrying in {}s", retry.interval.as_secs());
            debug!("Prompt probe ended with {:?}", outcome);
            retry.pause().await;
        }

        false
    }
}
