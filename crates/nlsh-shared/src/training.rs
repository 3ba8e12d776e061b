//! Built-in training corpus.
//!
//! Each intent carries a handful of phrasings. User-taught examples are
//! merged on top at retrain time (see `nlshctl::training_store`).

use crate::error::{NlshError, Result};
use crate::intent::Intent;
use crate::vectorizer::normalize;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashSet};

/// One labelled utterance
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TrainingExample {
    pub text: String,
    pub label: Intent,
}

impl TrainingExample {
    pub fn new(text: impl Into<String>, label: Intent) -> Self {
        Self {
            text: text.into(),
            label,
        }
    }
}

const CORPUS: &[(Intent, &[&str])] = &[
    (
        Intent::ListFiles,
        &[
            "list files",
            "show files",
            "list all files",
            "what files are here",
            "show me the files in this folder",
            "ls",
            "list directory contents",
            "display files in current directory",
            "what is in this directory",
        ],
    ),
    (
        Intent::ListFilesDetailed,
        &[
            "list files with details",
            "show detailed file list",
            "list all files including hidden",
            "show hidden files",
            "ls -la",
            "list files with permissions and sizes",
            "long listing of files",
            "show all files with details",
        ],
    ),
    (
        Intent::CreateDirectory,
        &[
            "create a folder named test",
            "create a folder named docs",
            "make a new directory called src",
            "create directory build",
            "mkdir projects",
            "make folder photos",
            "create a new folder",
            "new directory named logs",
            "create folder backup",
            "make a directory",
        ],
    ),
    (
        Intent::DeleteDirectory,
        &[
            "delete folder temp",
            "remove the directory build",
            "delete the folder named old",
            "remove directory with its contents",
            "rmdir logs",
            "delete directory cache",
            "erase the folder backup",
            "remove folder recursively",
        ],
    ),
    (
        Intent::CurrentDirectory,
        &[
            "where am i",
            "show current directory",
            "print working directory",
            "pwd",
            "what directory am i in",
            "current path",
            "which folder am i in",
            "show my current location",
        ],
    ),
    (
        Intent::ChangeDirectory,
        &[
            "go to documents",
            "cd into src",
            "change directory to projects",
            "go home",
            "go back",
            "go up one level",
            "navigate to downloads",
            "switch to the parent directory",
            "enter the folder src",
            "move into the desktop folder",
        ],
    ),
    (
        Intent::DeleteFiles,
        &[
            "delete file.txt",
            "remove notes.txt",
            "delete all txt files",
            "remove all log files",
            "rm old.log",
            "erase the file report.pdf",
            "delete the file called temp.txt",
            "remove files matching *.tmp",
            "delete it",
        ],
    ),
    (
        Intent::CopyFiles,
        &[
            "copy file.txt to backup",
            "copy notes.txt to documents",
            "cp main.py to src",
            "duplicate report.pdf to archive",
            "copy everything from src to dist",
            "copy the folder photos to backup",
            "make a copy of data.csv",
            "copy files from downloads to documents",
        ],
    ),
    (
        Intent::MoveFiles,
        &[
            "move file.txt to archive",
            "mv notes.txt to documents",
            "move all images to pictures",
            "move report.pdf into reports",
            "move the folder logs to backup",
            "relocate data.csv to data",
            "move files from downloads to desktop",
            "transfer music.mp3 to music",
        ],
    ),
    (
        Intent::Rename,
        &[
            "rename file.txt to new.txt",
            "rename notes.txt as todo.txt",
            "change the name of report.pdf to final.pdf",
            "rename the folder old to new",
            "rename main.py to app.py",
            "give data.csv a new name",
            "rename this file",
            "change filename of a.txt to b.txt",
        ],
    ),
    (
        Intent::ViewFile,
        &[
            "show contents of file.txt",
            "cat readme.md",
            "display notes.txt",
            "open config.json",
            "read the file log.txt",
            "print contents of main.py",
            "view data.csv",
            "what is inside notes.txt",
            "show me readme.md",
            "read it",
        ],
    ),
    (
        Intent::CreateFile,
        &[
            "create test.txt",
            "create notes.txt",
            "create a file called notes.txt",
            "create file.txt",
            "make a new file data.txt",
            "touch index.html",
            "create an empty file report.txt",
            "create readme.md",
            "new file main.py",
            "create a new empty file",
        ],
    ),
    (
        Intent::WriteFile,
        &[
            "write 'hello' in it",
            "write 'hello world' to notes.txt",
            "save 'data' to file.txt",
            "put 'text' into config.txt",
            "write text to a file",
            "write 'abc' into it",
            "write something in the file",
            "save the text 'done' in it",
            "write 'secret' in log.txt",
        ],
    ),
    (
        Intent::FindFiles,
        &[
            "find all txt files",
            "find files named config",
            "search for python files",
            "locate *.log",
            "find all pdf files",
            "where are the json files",
            "find files with extension md",
            "look for csv files",
        ],
    ),
    (
        Intent::SearchInFiles,
        &[
            "search for 'error' in log files",
            "grep 'todo' in src",
            "find the text 'hello' in files",
            "look for 'password' inside files",
            "search text 'main' in main.py",
            "which files contain 'import'",
            "search inside files for 'fixme'",
            "grep for 'warning' in app.log",
        ],
    ),
    (
        Intent::CountFiles,
        &[
            "count files",
            "how many files are here",
            "count all files in this directory",
            "number of files in src",
            "how many txt files",
            "count the files in downloads",
            "tell me how many files there are",
            "count files in folder",
        ],
    ),
    (
        Intent::CountLines,
        &[
            "count lines in file.txt",
            "how many lines in main.py",
            "line count of notes.txt",
            "wc -l log.txt",
            "number of lines in data.csv",
            "count the lines of readme.md",
            "how many lines does app.log have",
            "lines in report.txt",
        ],
    ),
    (
        Intent::CompareFiles,
        &[
            "compare old.txt to new.txt",
            "compare a.txt with b.txt",
            "diff old.txt new.txt",
            "show differences between v1.txt vs v2.txt",
            "diff config.json with backup.json",
            "compare two files",
            "what changed between draft.md to final.md",
            "find the difference between two files",
        ],
    ),
    (
        Intent::FileSize,
        &[
            "size of file.txt",
            "how big is video.mp4",
            "check folder size of downloads",
            "du -sh src",
            "show size of the directory photos",
            "file size of report.pdf",
            "how much space does backup use",
            "how large is this folder",
        ],
    ),
    (
        Intent::Compress,
        &[
            "compress folder photos",
            "zip the documents folder",
            "create a zip of src",
            "compress logs to archive",
            "make an archive from project",
            "zip up report.pdf",
            "compress files into backup",
            "pack the folder data into a zip",
        ],
    ),
    (
        Intent::Extract,
        &[
            "extract archive.zip",
            "unzip files.zip",
            "decompress backup.zip to restore",
            "extract data.tar.gz",
            "unpack the zip file",
            "extract project.zip into src",
            "uncompress photos.zip",
            "open the archive backup.zip",
        ],
    ),
    (
        Intent::Permissions,
        &[
            "make script.sh executable",
            "change permissions of run.sh",
            "chmod +x deploy.sh",
            "give execute permission to build.sh",
            "set permissions on file.txt",
            "make the file executable",
            "allow execution of start.sh",
            "make it executable",
        ],
    ),
    (
        Intent::ChangeOwner,
        &[
            "change owner of file.txt to root",
            "chown notes.txt to bob",
            "make bob the owner of notes.txt",
            "change ownership of data.csv",
            "set owner of log.txt to admin",
            "give ownership of project.zip to alice",
            "transfer ownership of report.pdf",
            "change the file owner",
        ],
    ),
    (
        Intent::MakeSymlink,
        &[
            "create a symlink",
            "make a symbolic link from data to current",
            "link /usr/bin/python3 to python",
            "symlink config.json to settings.json",
            "create a soft link",
            "ln -s target link",
            "make a shortcut link to folder",
            "create symbolic link from /opt/app to app",
        ],
    ),
    (
        Intent::Download,
        &[
            "download https://example.com/file.zip",
            "fetch the file from https://example.org/a.txt",
            "wget https://example.com/data.csv",
            "download file from url",
            "get the page www.example.com",
            "download image from https://site.com/pic.png",
            "grab https://example.com/archive.tar",
            "download this url",
        ],
    ),
    (
        Intent::SystemInfo,
        &[
            "show system info",
            "what os am i running",
            "system information",
            "uname",
            "show computer specs",
            "what version of the os",
            "display system details",
            "tell me about this machine",
        ],
    ),
    (
        Intent::DiskUsage,
        &[
            "show disk usage",
            "how much disk space is left",
            "check free space",
            "df",
            "disk space",
            "how full is my drive",
            "show storage usage",
            "check hard drive space",
        ],
    ),
    (
        Intent::ListProcesses,
        &[
            "list running processes",
            "show processes",
            "ps",
            "what is running",
            "show all running programs",
            "display active processes",
            "which processes are running",
            "task list",
        ],
    ),
    (
        Intent::KillProcess,
        &[
            "kill firefox",
            "stop process chrome",
            "kill process named node",
            "terminate python",
            "end task notepad",
            "kill the process nginx",
            "force quit spotify",
            "stop running java",
        ],
    ),
    (
        Intent::SystemMonitor,
        &[
            "monitor system resources",
            "show cpu usage",
            "open htop",
            "top",
            "check memory usage",
            "show resource usage",
            "monitor cpu usage",
            "what is using my cpu",
        ],
    ),
    (
        Intent::Datetime,
        &[
            "what time is it",
            "show date",
            "current date",
            "what is today's date",
            "date",
            "show the time",
            "tell me the date",
            "what day is it",
        ],
    ),
    (
        Intent::ClearScreen,
        &[
            "clear screen",
            "clear the terminal",
            "cls",
            "clean the console",
            "clear",
            "wipe the screen",
            "reset terminal display",
            "clear console output",
        ],
    ),
    (
        Intent::EnvVars,
        &[
            "show environment variables",
            "list env vars",
            "print environment",
            "env",
            "what are my environment variables",
            "display all env variables",
            "show path variable",
            "list environment settings",
        ],
    ),
    (
        Intent::History,
        &[
            "show command history",
            "history",
            "what commands did i run",
            "list previous commands",
            "show my past commands",
            "recent commands",
            "display shell history",
            "command history",
        ],
    ),
    (
        Intent::Echo,
        &[
            "echo 'hello'",
            "print 'hello world'",
            "say 'hi'",
            "display the text 'done'",
            "echo hello world",
            "output 'test'",
            "print message 'finished'",
            "show text 'ready'",
        ],
    ),
    (
        Intent::Help,
        &[
            "help with ls",
            "how do i use grep",
            "show manual for tar",
            "man ssh",
            "help for git",
            "what does chmod do",
            "show help for find",
            "documentation for curl",
        ],
    ),
    (
        Intent::Shutdown,
        &[
            "shutdown the computer",
            "turn off my pc",
            "power off",
            "shut down now",
            "shutdown",
            "turn off the machine",
            "power down the system",
            "halt the computer",
        ],
    ),
    (
        Intent::Restart,
        &[
            "restart the computer",
            "reboot",
            "reboot now",
            "restart my pc",
            "restart system",
            "reboot the machine",
            "do a restart",
            "power cycle the computer",
        ],
    ),
    (
        Intent::UpdateSystem,
        &[
            "update system",
            "upgrade all packages",
            "update my packages",
            "apt update",
            "install updates",
            "upgrade the system",
            "update everything",
            "check for system updates",
        ],
    ),
    (
        Intent::InstallPackage,
        &[
            "install htop",
            "install package git",
            "apt install curl",
            "install nodejs",
            "add package vim",
            "get me the package wget",
            "install the program docker",
            "install python3",
        ],
    ),
    (
        Intent::CheckService,
        &[
            "check status of nginx service",
            "is apache running",
            "service status ssh",
            "systemctl status docker",
            "check if mysql service is up",
            "status of the sshd service",
            "is the service nginx active",
            "show service status for cron",
        ],
    ),
    (
        Intent::NetworkInfo,
        &[
            "show ip address",
            "what is my ip",
            "network configuration",
            "ifconfig",
            "ipconfig",
            "show network interfaces",
            "display network info",
            "what is my local ip address",
        ],
    ),
    (
        Intent::Ping,
        &[
            "ping google.com",
            "ping 8.8.8.8",
            "check connection to example.com",
            "is google.com reachable",
            "test connectivity to 192.168.1.1",
            "ping localhost",
            "send ping to github.com",
            "check if server.com is up",
        ],
    ),
    (
        Intent::PortScan,
        &[
            "scan ports on 192.168.1.1",
            "nmap example.com",
            "port scan localhost",
            "scan open ports of scanme.nmap.org",
            "check which ports are open on 10.0.0.1",
            "run a port scan against server.net",
            "scan host 192.168.0.10",
            "scan the network host example.org",
        ],
    ),
    (
        Intent::TraceRoute,
        &[
            "traceroute google.com",
            "trace route to example.com",
            "tracert 8.8.8.8",
            "show the path to github.com",
            "trace the route to 1.1.1.1",
            "how many hops to google.com",
            "trace network path to cloudflare.com",
            "route trace to server.com",
        ],
    ),
    (
        Intent::DnsLookup,
        &[
            "dns lookup google.com",
            "nslookup example.com",
            "resolve github.com",
            "what is the ip of google.com",
            "find dns records for example.org",
            "dig cloudflare.com",
            "look up the domain openai.com",
            "query dns for rust-lang.org",
        ],
    ),
    (
        Intent::CheckPorts,
        &[
            "show open ports",
            "list listening ports",
            "which ports are listening",
            "netstat",
            "check open ports on this machine",
            "show active connections",
            "what ports are in use",
            "display listening sockets",
        ],
    ),
    (
        Intent::SshConnect,
        &[
            "ssh into server.com",
            "connect to 192.168.1.5 via ssh",
            "ssh admin@myserver.net",
            "open ssh session to example.com",
            "remote login to 10.0.0.2",
            "connect via ssh to host.org",
            "start an ssh connection with 192.168.1.10",
            "log into remote server example.com",
        ],
    ),
    (
        Intent::FirewallAllow,
        &[
            "allow ssh through firewall",
            "open port for nginx in firewall",
            "firewall allow http",
            "let apache through the firewall",
            "add firewall rule for postgres",
            "ufw allow ssh",
            "permit traffic for redis in the firewall",
            "unblock app in firewall",
        ],
    ),
    (
        Intent::GetWifiPass,
        &[
            "show wifi password for HomeWifi",
            "get wifi password",
            "what is the wifi password",
            "show saved wifi key for Office",
            "wifi password for profile Guest",
            "retrieve wireless password",
            "get password of wifi network Cafe",
            "show wifi key",
        ],
    ),
    (
        Intent::GitStatus,
        &[
            "git status",
            "show git status",
            "what changed in the repo",
            "check repository status",
            "show modified files in git",
            "status of the git repo",
            "are there uncommitted changes",
            "git changes",
        ],
    ),
    (
        Intent::GitLog,
        &[
            "git log",
            "show commit history",
            "list recent commits",
            "show git log",
            "view commits",
            "last commits in repo",
            "commit log",
            "show the git history",
        ],
    ),
    (
        Intent::GitPull,
        &[
            "git pull",
            "pull latest changes",
            "update the repo from remote",
            "pull from origin",
            "sync repo with remote",
            "get latest code",
            "pull changes from git",
            "git pull origin main",
        ],
    ),
    (
        Intent::GitPush,
        &[
            "git push",
            "push my commits",
            "push changes to remote",
            "upload commits to origin",
            "push to github",
            "publish my commits",
            "send changes to the remote repo",
            "push the branch",
        ],
    ),
    (
        Intent::DockerPs,
        &[
            "docker ps",
            "list docker containers",
            "show running containers",
            "show all containers",
            "which containers are running",
            "list containers",
            "docker container list",
            "show docker containers status",
        ],
    ),
    (
        Intent::DockerImages,
        &[
            "docker images",
            "list docker images",
            "show images",
            "what docker images do i have",
            "show all container images",
            "list local images",
            "docker image list",
            "display docker images",
        ],
    ),
];

/// The built-in corpus, in table order
pub fn builtin_examples() -> Vec<TrainingExample> {
    CORPUS
        .iter()
        .flat_map(|(label, texts)| texts.iter().map(|t| TrainingExample::new(*t, *label)))
        .collect()
}

/// Reject blank texts and the synthetic `unknown` label
pub fn validate_examples(examples: &[TrainingExample]) -> Result<()> {
    if examples.is_empty() {
        return Err(NlshError::InvalidTrainingData("no training examples".into()));
    }
    for ex in examples {
        if normalize(&ex.text).is_empty() {
            return Err(NlshError::InvalidTrainingData(format!(
                "blank example for '{}'",
                ex.label
            )));
        }
        if ex.label.is_unknown() {
            return Err(NlshError::InvalidTrainingData(format!(
                "'{}' labelled as unknown",
                ex.text
            )));
        }
    }
    Ok(())
}

/// Append `extra` to `base`, skipping examples already present
/// (compared on normalised text and label).
pub fn merge(base: Vec<TrainingExample>, extra: &[TrainingExample]) -> Vec<TrainingExample> {
    let mut seen: HashSet<(String, Intent)> =
        base.iter().map(|e| (normalize(&e.text), e.label)).collect();
    let mut out = base;
    for ex in extra {
        if seen.insert((normalize(&ex.text), ex.label)) {
            out.push(ex.clone());
        }
    }
    out
}

/// Examples per label
pub fn intent_counts(examples: &[TrainingExample]) -> BTreeMap<Intent, usize> {
    let mut counts = BTreeMap::new();
    for ex in examples {
        *counts.entry(ex.label).or_insert(0) += 1;
    }
    counts
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    #[test]
    fn test_every_intent_has_examples() {
        let counts = intent_counts(&builtin_examples());
        for intent in Intent::TRAINABLE {
            let n = counts.get(intent).copied().unwrap_or(0);
            assert!(n >= 5, "{} has only {} examples", intent, n);
        }
        assert!(!counts.contains_key(&Intent::Unknown));
    }

    #[test]
    fn test_no_text_has_two_labels() {
        let mut by_text: HashMap<String, Intent> = HashMap::new();
        for ex in builtin_examples() {
            if let Some(prev) = by_text.insert(normalize(&ex.text), ex.label) {
                assert_eq!(prev, ex.label, "'{}' is labelled twice", ex.text);
            }
        }
    }

    #[test]
    fn test_builtin_corpus_is_valid() {
        assert!(validate_examples(&builtin_examples()).is_ok());
    }

    #[test]
    fn test_unknown_label_rejected() {
        let bad = vec![TrainingExample::new("make coffee", Intent::Unknown)];
        assert!(validate_examples(&bad).is_err());
    }

    #[test]
    fn test_merge_skips_duplicates() {
        let base = vec![TrainingExample::new("list files", Intent::ListFiles)];
        let extra = vec![
            TrainingExample::new("  LIST files ", Intent::ListFiles),
            TrainingExample::new("show hidden stuff", Intent::ListFilesDetailed),
        ];
        let merged = merge(base, &extra);
        assert_eq!(merged.len(), 2);
        assert_eq!(merged[1].label, Intent::ListFilesDetailed);
    }
}
