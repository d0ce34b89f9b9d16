/// Startup script flavour. Both pin min and max heap to the same value and
/// keep the console open after the server exits.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LaunchScript {
    /// `start.bat`, run through `cmd`.
    Batch,
    /// `start.sh`, POSIX shell.
    Shell,
}

impl LaunchScript {
    pub fn for_host() -> Self {
        if cfg!(target_os = "windows") {
            LaunchScript::Batch
        } else {
            LaunchScript::Shell
        }
    }

    pub fn file_name(&self) -> &'static str {
        match self {
            LaunchScript::Batch => "start.bat",
            LaunchScript::Shell => "start.sh",
        }
    }

    pub fn render(&self, ram_mb: u32, jar_name: &str) -> String {
        match self {
            LaunchScript::Batch => format!(
                "@echo off\n\
                 java -Xmx{ram}M -Xms{ram}M -jar {jar} nogui\n\
                 pause\n",
                ram = ram_mb,
                jar = jar_name
            ),
            LaunchScript::Shell => format!(
                "#!/bin/sh\n\
                 cd \"$(dirname \"$0\")\"\n\
                 java -Xmx{ram}M -Xms{ram}M -jar \"{jar}\" nogui\n\
                 printf 'Press Enter to close...'\n\
                 read _\n",
                ram = ram_mb,
                jar = jar_name
            ),
        }
    }
}
