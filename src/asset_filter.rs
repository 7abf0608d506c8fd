//! Platform/architecture/distro compatibility filtering for release assets.
//!
//! An asset name is rejected the first time it matches an exclusion rule;
//! rules never have to agree, a single hit is enough to drop the asset.

use lazy_static::lazy_static;
use regex::Regex;
use std::fs;

const WINDOWS_ONLY_EXT: &[&str] = &["exe", "msi"];
const POSIX_ONLY_EXT: &[&str] = &["tgz"];

const EXTENSION_DISTROS: &[(&str, &[&str])] = &[
    ("deb", &["ubuntu", "debian"]),
    ("rpm", &["rhel", "centos", "fedora", "amazon", "cloudlinux"]),
    ("apk", &["alpine"]),
    ("dmg", &["darwin"]),
];

const PLATFORM_MARKERS: &[(&str, &[&str])] = &[
    ("windows", &["windows", "win"]),
    ("linux", &["linux"]),
    ("macos", &["osx", "darwin"]),
    ("freebsd", &["freebsd", "netbsd", "openbsd"]),
];

const NON_AMD64_MARKERS: &[&str] = &[
    "i386", "i686", "arm", "arm64", "386", "ppc64", "armv7", "armv7l", "mips64", "mips64le",
    "ppc64le", "aarch64", "armhf", "armv7hl",
];

const X86_64_MARKERS: &[&str] = &["x86_64", "x86-64", "amd64", "x64"];

fn current_platform() -> &'static str {
    if cfg!(target_os = "windows") {
        "windows"
    } else if cfg!(target_os = "macos") {
        "macos"
    } else if cfg!(target_os = "freebsd") {
        "freebsd"
    } else {
        "linux"
    }
}

fn current_arch() -> &'static str {
    std::env::consts::ARCH
}

/// Reads `ID=` out of `/etc/os-release`, matching what the Python `distro`
/// package's `distro.id()` would return for mainstream distros. Returns
/// `None` off Linux or when the file can't be read.
pub fn current_distro_id() -> Option<String> {
    if !cfg!(target_os = "linux") {
        return None;
    }
    let contents = fs::read_to_string("/etc/os-release").ok()?;
    for line in contents.lines() {
        if let Some(value) = line.strip_prefix("ID=") {
            return Some(value.trim_matches('"').to_string());
        }
    }
    None
}

fn ext_not_compatible_with_os(ext: &str) -> bool {
    let os = current_platform();
    if os != "windows" && WINDOWS_ONLY_EXT.contains(&ext) {
        return true;
    }
    if os == "windows" && POSIX_ONLY_EXT.contains(&ext) {
        return true;
    }
    false
}

fn word_boundary_regex(word: &str) -> Regex {
    Regex::new(&format!(r"(?i)\b{}(\d+)?\b", regex::escape(word))).unwrap()
}

fn name_incompatible_with_platform(asset_name: &str) -> bool {
    let current = current_platform();
    for (platform_name, words) in PLATFORM_MARKERS {
        if *platform_name == current {
            continue;
        }
        for word in *words {
            if word_boundary_regex(word).is_match(asset_name) {
                return true;
            }
        }
    }
    false
}

fn not_compatible_to_distro(ext: &str) -> bool {
    if ext == "AppImage" {
        return false;
    }
    let Some(distro_id) = current_distro_id() else {
        return false;
    };
    for (candidate_ext, distros) in EXTENSION_DISTROS {
        if *candidate_ext == ext && !distros.contains(&distro_id.as_str()) {
            return true;
        }
    }
    false
}

fn not_compatible_bitness(asset_name: &str) -> bool {
    lazy_static! {
        static ref ARM_N: Regex = Regex::new(r"(?i)\barm\d+\b").unwrap();
    }
    match current_arch() {
        "x86_64" => {
            for word in NON_AMD64_MARKERS {
                if word_boundary_regex(word).is_match(asset_name) {
                    return true;
                }
            }
            ARM_N.is_match(asset_name)
        }
        "aarch64" => X86_64_MARKERS
            .iter()
            .any(|w| word_boundary_regex(w).is_match(asset_name)),
        _ => false,
    }
}

/// True if `asset_name` carries markers showing it's built for a different
/// OS, architecture, or Linux distro than the one `lastversion` is running
/// on — i.e. it should be filtered out of automatic asset selection.
pub fn asset_does_not_belong_to_machine(asset_name: &str) -> bool {
    let normalized = asset_name.replace('_', "-");
    let Some(ext) = path_extension(&normalized) else {
        return false;
    };

    if ext_not_compatible_with_os(&ext) {
        return true;
    }
    if name_incompatible_with_platform(&normalized) {
        return true;
    }
    if not_compatible_to_distro(&ext) {
        return true;
    }
    if not_compatible_bitness(&normalized) {
        return true;
    }
    false
}

fn path_extension(name: &str) -> Option<String> {
    std::path::Path::new(name)
        .extension()
        .and_then(|e| e.to_str())
        .map(str::to_string)
}

#[cfg(test)]
#[path = "tests/asset_filter_tests.rs"]
mod tests;
