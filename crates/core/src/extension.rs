use crate::model::{Rejection, Stage};

/// Extensions that are never accepted, whatever the content looks like.
const BLOCKED_EXTENSIONS: &[&str] = &[
    // Windows executables and installers
    "exe", "com", "scr", "pif", "dll", "cpl", "msi", "msp", "mst", "msix", "appx", "appxbundle",
    "gadget", "hta", "inf", "reg", "lnk", "scf",
    // Windows script hosts
    "bat", "cmd", "vb", "vbs", "vbe", "js", "jse", "ws", "wsf", "wsh", "wsc", "ps1", "ps1xml",
    "ps2", "psm1", "psc1", "msh",
    // Unix shells
    "sh", "bash", "zsh", "csh", "ksh", "fish", "command", "run",
    // Interpreted and server-side scripts
    "php", "phtml", "phar", "py", "pyc", "pyw", "pl", "rb", "cgi", "asp", "aspx", "jsp",
    // JVM
    "jar", "war", "ear", "class",
    // Native binaries and desktop packages
    "elf", "so", "dylib", "app", "dmg", "pkg", "mpkg", "deb", "rpm", "scpt", "workflow",
    // Mobile packages
    "apk", "aab", "ipa", "xap",
    // Self-extracting and cabinet archives
    "cab", "sfx",
];

/// Lower-cased text after the last `.`, or empty when there is none.
pub fn extension_of(file_name: &str) -> String {
    match file_name.rsplit_once('.') {
        Some((_, ext)) => ext.to_lowercase(),
        None => String::new(),
    }
}

pub fn is_blocked_extension(ext: &str) -> bool {
    let ext = ext.to_lowercase();
    BLOCKED_EXTENSIONS.contains(&ext.as_str())
}

/// Reject filenames whose extension is on the denylist.
pub fn check_extension(file_name: &str) -> Result<(), Rejection> {
    let ext = extension_of(file_name);
    if !ext.is_empty() && is_blocked_extension(&ext) {
        return Err(Rejection::new(
            Stage::Extension,
            format!("File extension '.{ext}' is not allowed for security reasons"),
        ));
    }
    Ok(())
}
