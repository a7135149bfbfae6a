//! Firmware upgrade over SNMP using the DOCSIS software-download objects.
//!
//! Used for cable modems (TG2492, CH7465, TG3492, F3896) that accept the
//! `docsDevSw*` writes. The modem is unreachable for part of the procedure
//! while it reboots into the new image, so every read after the trigger is
//! allowed to go unanswered.

use log::{debug, error, info, warn};

use super::UpgradeOutcome;
use super::settings::ProtocolUpgradeSettings;
use crate::mgmt::oid::{
    SW_ADMIN_STATUS, SW_FILENAME, SW_OPER_STATUS, SW_SERVER, SW_SERVER_TRANSPORT, SYS_DESCR,
};
use crate::mgmt::{ManagementSession, ObjectId, TypedValue};

/// Download status codes reported in `docsDevSwOperStatus`.
///
/// Only the two codes the procedure acts on are named; every other code is
/// treated as "not the expected one".
pub struct DownloadStatus;

impl DownloadStatus {
    /// Download in progress.
    pub const IN_PROGRESS: i64 = 1;

    /// Download completed and the image was accepted.
    pub const COMPLETED: i64 = 3;
}

/// Value written to `docsDevSwAdminStatus` to start the download.
const START_DOWNLOAD: i64 = 1;

/// SNMP upgrade orchestrator.
pub struct ProtocolUpgrade<M> {
    session: M,
    settings: ProtocolUpgradeSettings,
}

impl<M: ManagementSession> ProtocolUpgrade<M> {
    /// Create an orchestrator over a management session.
    pub fn new(session: M, settings: ProtocolUpgradeSettings) -> Self {
        Self { session, settings }
    }

    /// Get the session.
    pub fn session(&self) -> &M {
        &self.session
    }

    /// Consume the orchestrator and return the session.
    pub fn into_session(self) -> M {
        self.session
    }

    /// Full firmware path written to the modem for `target_fw`.
    pub fn firmware_path(&self, target_fw: &str) -> String {
        format!("{}{}", self.settings.firmware_dir, target_fw)
    }

    /// Upgrade the device to `target_fw`, a file name in the server's
    /// firmware folder.
    pub async fn run(&mut self, target_fw: &str) -> UpgradeOutcome {
        let path = self.firmware_path(target_fw);

        self.write_and_log(
            &SW_SERVER_TRANSPORT,
            TypedValue::Integer(self.settings.transport_mode),
            "HTTP mode",
        )
        .await;
        self.write_and_log(&SW_FILENAME, TypedValue::OctetString(path), "FW filepath")
            .await;
        self.write_and_log(
            &SW_SERVER,
            TypedValue::IpAddress(self.settings.server_address),
            "DL server",
        )
        .await;
        self.write_and_log(
            &SW_ADMIN_STATUS,
            TypedValue::Integer(START_DOWNLOAD),
            "Start DL status",
        )
        .await;

        tokio::time::sleep(self.settings.first_status_delay).await;

        let Some(status) = read_status(&mut self.session).await else {
            error!("Invalid upgrade status, exiting...");
            return UpgradeOutcome::Indeterminate;
        };
        info!("DL status: {}", status);

        if status != DownloadStatus::IN_PROGRESS {
            error!("Upgrade failed, status: {}", status);
            return UpgradeOutcome::Indeterminate;
        }

        let monitor_delay = self.settings.monitor_delay;
        info!("Upgrade started, starting status checks in {}s", monitor_delay.as_secs());
        tokio::time::sleep(monitor_delay).await;

        let status = self.monitor_download(status).await;
        if status != DownloadStatus::COMPLETED {
            error!("Upgrade not completed, exiting...");
            debug!("Last download status: {}", status);
            return UpgradeOutcome::Indeterminate;
        }

        info!("Upgrade completed, checking for SNMP response from DUT");
        if self.confirm_identity().await {
            UpgradeOutcome::Succeeded
        } else {
            error!("No SNMP response from DUT after upgrade");
            UpgradeOutcome::Indeterminate
        }
    }

    /// Write a variable and log what the device reads back.
    ///
    /// Failures are logged only; the status read after the trigger decides
    /// whether the procedure continues.
    async fn write_and_log(&mut self, oid: &ObjectId, value: TypedValue, label: &str) {
        if let Err(e) = self.session.set(oid, value).await {
            error!("Error setting {}: {}", label, e);
        }

        match self.session.get(oid).await {
            Ok(value) => info!("{}: {}", label, value),
            Err(e) => warn!("{}: no response ({})", label, e),
        }
    }

    /// Poll the download status while it reads "in progress".
    ///
    /// Unanswered polls keep the last known status: the modem drops off the
    /// network while it reboots. Every poll is followed by one interval,
    /// including the one that sees the status change. Returns the last
    /// status seen.
    async fn monitor_download(&mut self, initial: i64) -> i64 {
        let poll = self.settings.status_poll;
        let mut status = initial;

        for attempt in poll.attempts() {
            if status != DownloadStatus::IN_PROGRESS {
                break;
            }

            let elapsed = poll.elapsed_before(attempt).as_secs();
            match read_status(&mut self.session).await {
                Some(current) => {
                    status = current;
                    info!("DUT online, current status: {} ({}s elapsed)", status, elapsed);
                }
                None => info!(
                    "No response from DUT, rechecking in {}s ({}s elapsed)",
                    poll.interval.as_secs(),
                    elapsed
                ),
            }
            poll.pause().await;
        }

        status
    }

    /// Poll `sysDescr.0` until the agent answers with a non-empty value.
    async fn confirm_identity(&mut self) -> bool {
        let poll = self.settings.identity_poll;

        for attempt in poll.attempts() {
            match self.session.get(&SYS_DESCR).await {
                Ok(descr) if !descr.is_empty() => {
                    info!("DUT online, sysDescr.0 output: {}", descr);
                    return true;
                }
                Ok(_) => debug!("Empty sysDescr.0"),
                Err(e) => debug!("sysDescr.0 read failed: {}", e),
            }
            info!(
                "No sysDescr.0 output from DUT, rechecking in {}s ({}s elapsed)",
                poll.interval.as_secs(),
                poll.elapsed_before(attempt).as_secs()
            );
            poll.pause().await;
        }

        false
    }
}

/// Read the download status; `None` if unanswered or not an integer.
async fn read_status<M: ManagementSession>(session: &mut M) -> Option<i64> {
    match session.get(&SW_OPER_STATUS).await {
        Ok(value) => {
            let status = value.as_integer();
            if status.is_none() {
                debug!("Download status is not an integer: {:?}", value);
            }
            status
        }
        Err(e) => {
            debug!("Download status read failed: {}", e);
            None
        }
    }
}
