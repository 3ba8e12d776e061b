//! Built-in command templates, one set per intent.
//!
//! Placeholders: `{slot}` is required, `{slot=default}` falls back to the
//! default. PowerShell script blocks such as `{$_.Name}` are not
//! placeholders. The engine quotes each value for the target shell, so
//! patterns never put quotes around a placeholder.

use crate::intent::Intent;

/// Variants of one intent's command
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TemplateSet {
    pub posix: Option<&'static str>,
    pub windows: Option<&'static str>,
    /// Used when the target OS has no variant of its own
    pub neutral: Option<&'static str>,
    pub description: &'static str,
    pub destructive: bool,
}

impl TemplateSet {
    const fn split(posix: &'static str, windows: &'static str, description: &'static str) -> Self {
        Self {
            posix: Some(posix),
            windows: Some(windows),
            neutral: None,
            description,
            destructive: false,
        }
    }

    const fn neutral(command: &'static str, description: &'static str) -> Self {
        Self {
            posix: None,
            windows: None,
            neutral: Some(command),
            description,
            destructive: false,
        }
    }

    const fn posix_only(posix: &'static str, description: &'static str) -> Self {
        Self {
            posix: Some(posix),
            windows: None,
            neutral: None,
            description,
            destructive: false,
        }
    }

    const fn none(description: &'static str) -> Self {
        Self {
            posix: None,
            windows: None,
            neutral: None,
            description,
            destructive: false,
        }
    }

    const fn destructive(mut self) -> Self {
        self.destructive = true;
        self
    }
}

pub fn builtin(intent: Intent) -> TemplateSet {
    match intent {
        // Listing
        Intent::ListFiles => TemplateSet::split("ls", "Get-ChildItem", "List files in the current directory"),
        Intent::ListFilesDetailed => TemplateSet::split(
            "ls -la",
            "Get-ChildItem -Force | Format-Table Mode, LastWriteTime, Length, Name",
            "List files with details, including hidden ones",
        ),

        // Directories
        Intent::CreateDirectory => TemplateSet::split(
            "mkdir -p {directory}",
            "New-Item -ItemType Directory -Name {directory}",
            "Create a new directory",
        ),
        Intent::DeleteDirectory => TemplateSet::split(
            "rm -rf {directory}",
            "Remove-Item -Recurse -Force {directory}",
            "Delete a directory and its contents",
        )
        .destructive(),
        Intent::CurrentDirectory => {
            TemplateSet::split("pwd", "Get-Location", "Show the current working directory")
        }
        Intent::ChangeDirectory => TemplateSet::split(
            "cd {directory}",
            "Set-Location {directory}",
            "Change to another directory",
        ),

        // Files
        Intent::DeleteFiles => {
            TemplateSet::split("rm {target}", "Remove-Item {target}", "Delete files").destructive()
        }
        Intent::CopyFiles => TemplateSet::split(
            "cp -r {source} {destination}",
            "Copy-Item {source} -Destination {destination} -Recurse",
            "Copy files from source to destination",
        ),
        Intent::MoveFiles => TemplateSet::split(
            "mv {source} {destination}",
            "Move-Item {source} -Destination {destination}",
            "Move files from source to destination",
        ),
        Intent::Rename => TemplateSet::split(
            "mv {filename} {new_name}",
            "Rename-Item {filename} -NewName {new_name}",
            "Rename a file or directory",
        ),
        Intent::ViewFile => TemplateSet::split(
            "cat {filename}",
            "Get-Content {filename}",
            "Display file contents",
        ),
        Intent::CreateFile => TemplateSet::split(
            "touch {filename}",
            "New-Item -ItemType File -Name {filename}",
            "Create an empty file",
        ),
        Intent::WriteFile => TemplateSet::split(
            "echo {text} > {filename}",
            "Set-Content -Path {filename} -Value {text}",
            "Write text to a file, replacing its contents",
        )
        .destructive(),

        // Search and inspection
        Intent::FindFiles => TemplateSet::split(
            "find . -name {pattern}",
            "Get-ChildItem -Recurse -Filter {pattern}",
            "Find files matching a pattern",
        ),
        Intent::SearchInFiles => TemplateSet::split(
            "grep -r {text} {target=.}",
            "Select-String -Pattern {text} -Path {target=*}",
            "Search for text within files",
        ),
        Intent::CountFiles => TemplateSet::split(
            "ls -1 {target=.} | wc -l",
            "(Get-ChildItem {target=.} | Measure-Object).Count",
            "Count files in a directory",
        ),
        Intent::CountLines => TemplateSet::split(
            "wc -l {filename}",
            "Get-Content {filename} | Measure-Object -Line",
            "Count lines in a file",
        ),
        Intent::CompareFiles => TemplateSet::split(
            "diff {source} {destination}",
            "Compare-Object (Get-Content {source}) (Get-Content {destination})",
            "Compare two files",
        ),
        Intent::FileSize => TemplateSet::split(
            "du -sh {path=.}",
            "Get-ChildItem {path=.} -Recurse | Measure-Object -Property Length -Sum",
            "Show file or folder size",
        ),

        // Archives
        Intent::Compress => TemplateSet::split(
            "zip -r {destination=archive.zip} {source}",
            "Compress-Archive -Path {source} -DestinationPath {destination=archive.zip}",
            "Compress files or folders",
        ),
        Intent::Extract => TemplateSet::split(
            "unzip {source} -d {destination=.}",
            "Expand-Archive -Path {source} -DestinationPath {destination=.}",
            "Extract an archive",
        ),

        // Ownership and links
        Intent::Permissions => {
            TemplateSet::posix_only("chmod +x {filename}", "Make a file executable")
        }
        Intent::ChangeOwner => TemplateSet::split(
            "sudo chown {owner} {filename}",
            "icacls {filename} /setowner {owner}",
            "Change file owner",
        )
        .destructive(),
        Intent::MakeSymlink => TemplateSet::split(
            "ln -s {source} {destination}",
            "New-Item -ItemType SymbolicLink -Path {destination} -Target {source}",
            "Create a symbolic link",
        ),
        Intent::Download => TemplateSet::split(
            "curl -L -O {url}",
            "Invoke-WebRequest -Uri {url} -OutFile {filename=download}",
            "Download a file from a URL",
        ),

        // System
        Intent::SystemInfo => TemplateSet::split(
            "uname -a",
            "Get-ComputerInfo | Select-Object WindowsProductName, OsVersion, CsProcessors",
            "Display system information",
        ),
        Intent::DiskUsage => TemplateSet::split(
            "df -h",
            "Get-PSDrive -PSProvider FileSystem | Select-Object Name, Used, Free",
            "Show disk usage",
        ),
        Intent::ListProcesses => TemplateSet::split(
            "ps aux | head -20",
            "Get-Process | Sort-Object CPU -Descending | Select-Object -First 20",
            "List running processes",
        ),
        Intent::KillProcess => TemplateSet::split(
            "pkill -f {process}",
            "Stop-Process -Name {process} -Force",
            "Kill a process by name",
        )
        .destructive(),
        Intent::SystemMonitor => TemplateSet::split(
            "htop || top",
            "Get-Process | Sort-Object CPU -Descending | Select-Object -First 10 | Format-Table",
            "Monitor system resources",
        ),
        Intent::Datetime => TemplateSet::split("date", "Get-Date", "Show the current date and time"),
        Intent::ClearScreen => TemplateSet::split("clear", "Clear-Host", "Clear the terminal screen"),
        Intent::EnvVars => {
            TemplateSet::split("env", "Get-ChildItem Env:", "Show environment variables")
        }
        Intent::History => TemplateSet::split("history", "Get-History", "Show command history"),
        Intent::Echo => TemplateSet::split(
            "echo {text}",
            "Write-Output {text}",
            "Print text to the terminal",
        ),
        Intent::Help => {
            TemplateSet::split("man {command}", "Get-Help {command}", "Show help for a command")
        }
        Intent::Shutdown => TemplateSet::split(
            "sudo shutdown -h now",
            "Stop-Computer -Force",
            "Shut down the computer",
        )
        .destructive(),
        Intent::Restart => {
            TemplateSet::split("sudo reboot", "Restart-Computer -Force", "Restart the computer")
                .destructive()
        }
        Intent::UpdateSystem => TemplateSet::split(
            "sudo apt update && sudo apt upgrade -y",
            "winget upgrade --all",
            "Update system packages",
        )
        .destructive(),
        Intent::InstallPackage => TemplateSet::split(
            "sudo apt install {package}",
            "winget install {package}",
            "Install a package",
        )
        .destructive(),
        Intent::CheckService => TemplateSet::split(
            "systemctl status {service}",
            "Get-Service -Name {service}",
            "Check service status",
        ),

        // Network
        Intent::NetworkInfo => TemplateSet::split(
            "ip addr show 2>/dev/null || ifconfig",
            "Get-NetIPAddress | Where-Object {$_.AddressFamily -eq 'IPv4'}",
            "Show network configuration",
        ),
        Intent::Ping => TemplateSet::split(
            "ping -c 4 {host}",
            "Test-Connection -ComputerName {host} -Count 4",
            "Ping a host",
        ),
        Intent::PortScan => TemplateSet::split(
            "nmap {host}",
            "Test-NetConnection -ComputerName {host} -Port 80",
            "Scan ports on a host",
        )
        .destructive(),
        Intent::TraceRoute => TemplateSet::split(
            "traceroute {host}",
            "Test-NetConnection -ComputerName {host} -TraceRoute",
            "Trace the route to a host",
        ),
        Intent::DnsLookup => TemplateSet::split(
            "nslookup {host} || dig {host}",
            "Resolve-DnsName -Name {host}",
            "Look up DNS records",
        ),
        Intent::CheckPorts => TemplateSet::split(
            "netstat -tuln || ss -tuln",
            "Get-NetTCPConnection | Where-Object State -eq Listen",
            "Show listening ports",
        ),
        Intent::SshConnect => TemplateSet::neutral("ssh {host}", "Connect over SSH"),
        Intent::FirewallAllow => TemplateSet::split(
            "sudo ufw allow {service}",
            "New-NetFirewallRule -DisplayName {service} -Direction Inbound -Program {service} -Action Allow",
            "Allow an application through the firewall",
        )
        .destructive(),
        Intent::GetWifiPass => TemplateSet::split(
            "sudo grep psk= /etc/NetworkManager/system-connections/{profile}.nmconnection",
            "netsh wlan show profile name={profile} key=clear",
            "Show a saved Wi-Fi password",
        )
        .destructive(),

        // Version control and containers
        Intent::GitStatus => TemplateSet::neutral("git status", "Show git repository status"),
        Intent::GitLog => {
            TemplateSet::neutral("git log --oneline --graph --decorate -n 10", "Show git commit log")
        }
        Intent::GitPull => TemplateSet::neutral("git pull", "Pull latest changes"),
        Intent::GitPush => TemplateSet::neutral("git push", "Push commits to the remote"),
        Intent::DockerPs => TemplateSet::neutral("docker ps -a", "List docker containers"),
        Intent::DockerImages => TemplateSet::neutral("docker images", "List docker images"),

        Intent::Unknown => TemplateSet::none("Unrecognised request"),
    }
}
