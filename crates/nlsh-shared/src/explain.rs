//! Short human-readable explanations of shell commands.

const FALLBACK: &str = "This command will be executed in your shell.";

/// Leading program name (lowercase) and what it does
const EXPLANATIONS: &[(&str, &str)] = &[
    ("ls", "Lists files and directories in the current location."),
    ("dir", "Lists files and directories in the current location (Windows)."),
    ("get-childitem", "Lists files and directories (PowerShell)."),
    ("cd", "Changes the current directory."),
    ("set-location", "Changes the current directory (PowerShell)."),
    ("pwd", "Prints the current working directory path."),
    ("get-location", "Prints the current working directory path (PowerShell)."),
    ("mkdir", "Creates a new directory."),
    ("new-item", "Creates a new file or directory (PowerShell)."),
    ("touch", "Creates an empty file or updates its timestamp."),
    ("rm", "Removes/deletes files. Use with caution!"),
    ("del", "Deletes files (Windows). Use with caution!"),
    ("remove-item", "Deletes files or directories (PowerShell). Use with caution!"),
    ("cp", "Copies files from source to destination."),
    ("copy", "Copies files (Windows)."),
    ("copy-item", "Copies files from source to destination (PowerShell)."),
    ("mv", "Moves or renames files."),
    ("move", "Moves files (Windows)."),
    ("move-item", "Moves files (PowerShell)."),
    ("rename-item", "Renames a file or directory (PowerShell)."),
    ("cat", "Displays the contents of a file."),
    ("type", "Displays file contents (Windows)."),
    ("get-content", "Displays the contents of a file (PowerShell)."),
    ("set-content", "Writes text to a file, replacing its contents (PowerShell)."),
    ("echo", "Prints text, or writes it to a file when redirected."),
    ("write-output", "Prints text (PowerShell)."),
    ("grep", "Searches for text patterns in files."),
    ("select-string", "Searches for text patterns in files (PowerShell)."),
    ("find", "Finds files matching criteria."),
    ("wc", "Counts lines, words or bytes."),
    ("diff", "Shows the differences between two files."),
    ("zip", "Compresses files into a zip archive."),
    ("unzip", "Extracts a zip archive."),
    ("compress-archive", "Compresses files into a zip archive (PowerShell)."),
    ("expand-archive", "Extracts a zip archive (PowerShell)."),
    ("ln", "Creates a link to a file."),
    ("curl", "Transfers data from or to a URL."),
    ("invoke-webrequest", "Downloads content from a URL (PowerShell)."),
    ("ps", "Shows running processes."),
    ("get-process", "Shows running processes (PowerShell)."),
    ("kill", "Terminates a running process."),
    ("pkill", "Terminates processes matching a name."),
    ("stop-process", "Terminates a running process (PowerShell)."),
    ("htop", "Shows an interactive view of system resources."),
    ("top", "Shows an interactive view of system resources."),
    ("ping", "Tests network connectivity to a host."),
    ("test-connection", "Tests network connectivity to a host (PowerShell)."),
    ("traceroute", "Shows the network route to a host."),
    ("nslookup", "Looks up DNS records for a host."),
    ("resolve-dnsname", "Looks up DNS records for a host (PowerShell)."),
    ("nmap", "Scans a host for open ports."),
    ("netstat", "Shows network connections and listening ports."),
    ("ssh", "Opens a remote shell over SSH."),
    ("chmod", "Changes file permissions (Unix)."),
    ("chown", "Changes file ownership (Unix)."),
    ("icacls", "Changes file permissions or ownership (Windows)."),
    ("df", "Shows disk space usage."),
    ("du", "Shows directory size."),
    ("uname", "Shows system information."),
    ("date", "Shows the current date and time."),
    ("get-date", "Shows the current date and time (PowerShell)."),
    ("clear", "Clears the terminal screen."),
    ("clear-host", "Clears the terminal screen (PowerShell)."),
    ("env", "Shows environment variables."),
    ("history", "Shows command history."),
    ("man", "Shows the manual page of a command."),
    ("get-help", "Shows help for a command (PowerShell)."),
    ("systemctl", "Manages or inspects system services."),
    ("get-service", "Shows the status of a service (PowerShell)."),
    ("apt", "Manages system packages."),
    ("winget", "Manages packages (Windows)."),
    ("ufw", "Manages firewall rules."),
    ("shutdown", "Shuts down the computer."),
    ("stop-computer", "Shuts down the computer (PowerShell)."),
    ("reboot", "Restarts the computer."),
    ("restart-computer", "Restarts the computer (PowerShell)."),
    ("git", "Runs a git version control operation."),
    ("docker", "Runs a docker container operation."),
];

/// Explanation for one simple command, ignoring a leading `sudo`
fn explain_simple(command: &str) -> Option<&'static str> {
    let mut words = command.split_whitespace();
    let mut program = words.next()?;
    if program == "sudo" {
        program = words.next()?;
    }
    let program = program.trim_start_matches('(').to_lowercase();
    EXPLANATIONS
        .iter()
        .find(|(name, _)| *name == program)
        .map(|(_, text)| *text)
}

/// Explain a command line. Chained commands (`&&`, `;`, `||`) are explained
/// in order; unknown programs fall back to a generic sentence.
pub fn explain_command(command: &str) -> String {
    let mut parts: Vec<&'static str> = Vec::new();
    for segment in command.split("&&").flat_map(|s| s.split(';')).flat_map(|s| s.split("||")) {
        if let Some(text) = explain_simple(segment) {
            if !parts.contains(&text) {
                parts.push(text);
            }
        }
    }
    if parts.is_empty() {
        FALLBACK.to_string()
    } else {
        parts.join(" ")
    }
}
