//! Closed intent label set and target platforms.
//!
//! Labels are snake_case on the wire (training data, model artifact, JSON
//! output). `Intent::Unknown` is synthetic: the classifier emits it below the
//! confidence threshold and it is never trained.

use crate::error::NlshError;
use serde::{Deserialize, Serialize};
use std::str::FromStr;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Intent {
    // Files and directories
    ListFiles,
    ListFilesDetailed,
    CreateDirectory,
    DeleteDirectory,
    CurrentDirectory,
    ChangeDirectory,
    DeleteFiles,
    CopyFiles,
    MoveFiles,
    Rename,
    ViewFile,
    CreateFile,
    WriteFile,
    FindFiles,
    SearchInFiles,
    CountFiles,
    CountLines,
    CompareFiles,
    FileSize,
    Compress,
    Extract,
    Permissions,
    ChangeOwner,
    MakeSymlink,
    Download,
    // System
    SystemInfo,
    DiskUsage,
    ListProcesses,
    KillProcess,
    SystemMonitor,
    Datetime,
    ClearScreen,
    EnvVars,
    History,
    Echo,
    Help,
    Shutdown,
    Restart,
    UpdateSystem,
    InstallPackage,
    CheckService,
    // Network
    NetworkInfo,
    Ping,
    PortScan,
    TraceRoute,
    DnsLookup,
    CheckPorts,
    SshConnect,
    FirewallAllow,
    GetWifiPass,
    // Version control and containers
    GitStatus,
    GitLog,
    GitPull,
    GitPush,
    DockerPs,
    DockerImages,
    /// Below-threshold classification; never a training label
    Unknown,
}

impl Intent {
    /// Every trainable intent, in declaration order.
    pub const TRAINABLE: &'static [Intent] = &[
        Intent::ListFiles,
        Intent::ListFilesDetailed,
        Intent::CreateDirectory,
        Intent::DeleteDirectory,
        Intent::CurrentDirectory,
        Intent::ChangeDirectory,
        Intent::DeleteFiles,
        Intent::CopyFiles,
        Intent::MoveFiles,
        Intent::Rename,
        Intent::ViewFile,
        Intent::CreateFile,
        Intent::WriteFile,
        Intent::FindFiles,
        Intent::SearchInFiles,
        Intent::CountFiles,
        Intent::CountLines,
        Intent::CompareFiles,
        Intent::FileSize,
        Intent::Compress,
        Intent::Extract,
        Intent::Permissions,
        Intent::ChangeOwner,
        Intent::MakeSymlink,
        Intent::Download,
        Intent::SystemInfo,
        Intent::DiskUsage,
        Intent::ListProcesses,
        Intent::KillProcess,
        Intent::SystemMonitor,
        Intent::Datetime,
        Intent::ClearScreen,
        Intent::EnvVars,
        Intent::History,
        Intent::Echo,
        Intent::Help,
        Intent::Shutdown,
        Intent::Restart,
        Intent::UpdateSystem,
        Intent::InstallPackage,
        Intent::CheckService,
        Intent::NetworkInfo,
        Intent::Ping,
        Intent::PortScan,
        Intent::TraceRoute,
        Intent::DnsLookup,
        Intent::CheckPorts,
        Intent::SshConnect,
        Intent::FirewallAllow,
        Intent::GetWifiPass,
        Intent::GitStatus,
        Intent::GitLog,
        Intent::GitPull,
        Intent::GitPush,
        Intent::DockerPs,
        Intent::DockerImages,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Intent::ListFiles => "list_files",
            Intent::ListFilesDetailed => "list_files_detailed",
            Intent::CreateDirectory => "create_directory",
            Intent::DeleteDirectory => "delete_directory",
            Intent::CurrentDirectory => "current_directory",
            Intent::ChangeDirectory => "change_directory",
            Intent::DeleteFiles => "delete_files",
            Intent::CopyFiles => "copy_files",
            Intent::MoveFiles => "move_files",
            Intent::Rename => "rename",
            Intent::ViewFile => "view_file",
            Intent::CreateFile => "create_file",
            Intent::WriteFile => "write_file",
            Intent::FindFiles => "find_files",
            Intent::SearchInFiles => "search_in_files",
            Intent::CountFiles => "count_files",
            Intent::CountLines => "count_lines",
            Intent::CompareFiles => "compare_files",
            Intent::FileSize => "file_size",
            Intent::Compress => "compress",
            Intent::Extract => "extract",
            Intent::Permissions => "permissions",
            Intent::ChangeOwner => "change_owner",
            Intent::MakeSymlink => "make_symlink",
            Intent::Download => "download",
            Intent::SystemInfo => "system_info",
            Intent::DiskUsage => "disk_usage",
            Intent::ListProcesses => "list_processes",
            Intent::KillProcess => "kill_process",
            Intent::SystemMonitor => "system_monitor",
            Intent::Datetime => "datetime",
            Intent::ClearScreen => "clear_screen",
            Intent::EnvVars => "env_vars",
            Intent::History => "history",
            Intent::Echo => "echo",
            Intent::Help => "help",
            Intent::Shutdown => "shutdown",
            Intent::Restart => "restart",
            Intent::UpdateSystem => "update_system",
            Intent::InstallPackage => "install_package",
            Intent::CheckService => "check_service",
            Intent::NetworkInfo => "network_info",
            Intent::Ping => "ping",
            Intent::PortScan => "port_scan",
            Intent::TraceRoute => "trace_route",
            Intent::DnsLookup => "dns_lookup",
            Intent::CheckPorts => "check_ports",
            Intent::SshConnect => "ssh_connect",
            Intent::FirewallAllow => "firewall_allow",
            Intent::GetWifiPass => "get_wifi_pass",
            Intent::GitStatus => "git_status",
            Intent::GitLog => "git_log",
            Intent::GitPull => "git_pull",
            Intent::GitPush => "git_push",
            Intent::DockerPs => "docker_ps",
            Intent::DockerImages => "docker_images",
            Intent::Unknown => "unknown",
        }
    }

    pub fn is_unknown(&self) -> bool {
        matches!(self, Intent::Unknown)
    }
}

impl std::fmt::Display for Intent {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Intent {
    type Err = NlshError;

    /// Parses a trainable label. `unknown` is rejected: it is never a
    /// legitimate training or model label.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim().to_lowercase();
        Intent::TRAINABLE
            .iter()
            .copied()
            .find(|i| i.as_str() == wanted)
            .ok_or_else(|| NlshError::UnknownIntent(s.to_string()))
    }
}

/// Target shell family for generated commands.
///
/// `Windows` means PowerShell; `Posix` covers bash/zsh/fish on Linux and macOS.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TargetOs {
    Posix,
    Windows,
}

impl TargetOs {
    pub const ALL: [TargetOs; 2] = [TargetOs::Posix, TargetOs::Windows];

    /// Platform this binary was built for
    pub fn host() -> Self {
        if cfg!(windows) {
            TargetOs::Windows
        } else {
            TargetOs::Posix
        }
    }

    /// Separator used to chain the commands of a multi-step request
    pub fn command_separator(&self) -> &'static str {
        match self {
            TargetOs::Posix => " && ",
            TargetOs::Windows => "; ",
        }
    }

    pub fn display_name(&self) -> &'static str {
        match self {
            TargetOs::Posix => "POSIX shell",
            TargetOs::Windows => "PowerShell",
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            TargetOs::Posix => "posix",
            TargetOs::Windows => "windows",
        }
    }
}

impl std::fmt::Display for TargetOs {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for TargetOs {
    type Err = NlshError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "posix" | "unix" | "linux" | "macos" | "darwin" | "bash" | "zsh" | "sh" => {
                Ok(TargetOs::Posix)
            }
            "windows" | "win" | "powershell" | "pwsh" => Ok(TargetOs::Windows),
            other => Err(NlshError::Config(format!("unknown target OS '{}'", other))),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_label_set_is_large_enough() {
        assert!(Intent::TRAINABLE.len() >= 50);
        assert!(!Intent::TRAINABLE.contains(&Intent::Unknown));
    }

    #[test]
    fn test_labels_round_trip_through_from_str() {
        for intent in Intent::TRAINABLE {
            assert_eq!(intent.as_str().parse::<Intent>().unwrap(), *intent);
        }
    }

    #[test]
    fn test_labels_are_unique() {
        let mut labels: Vec<&str> = Intent::TRAINABLE.iter().map(|i| i.as_str()).collect();
        labels.sort();
        labels.dedup();
        assert_eq!(labels.len(), Intent::TRAINABLE.len());
    }

    #[test]
    fn test_unknown_is_not_parseable() {
        assert!("unknown".parse::<Intent>().is_err());
        assert!("make_coffee".parse::<Intent>().is_err());
    }

    #[test]
    fn test_serde_uses_snake_case() {
        let json = serde_json::to_string(&Intent::CreateDirectory).unwrap();
        assert_eq!(json, "\"create_directory\"");
        let os: TargetOs = serde_json::from_str("\"windows\"").unwrap();
        assert_eq!(os, TargetOs::Windows);
    }

    #[test]
    fn test_target_os_aliases() {
        assert_eq!("Linux".parse::<TargetOs>().unwrap(), TargetOs::Posix);
        assert_eq!("powershell".parse::<TargetOs>().unwrap(), TargetOs::Windows);
        assert!("amiga".parse::<TargetOs>().is_err());
    }

    #[test]
    fn test_command_separators() {
        assert_eq!(TargetOs::Posix.command_separator(), " && ");
        assert_eq!(TargetOs::Windows.command_separator(), "; ");
    }
}
