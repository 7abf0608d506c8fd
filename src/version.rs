//! PEP 440–compatible version parsing, normalization and comparison.
//!
//! Upstream tags are rarely valid PEP 440 strings on their own
//! (`release-3_0_2`, `v2.41.0-rc2.windows.1`, `8u462-b08`, `foo@1.2.3`).
//! [`Version::parse`] runs the raw tag through a normalization pipeline
//! before handing it to the PEP 440 grammar, so that heterogeneous upstream
//! spellings become comparable versions.

use lazy_static::lazy_static;
use regex::Regex;
use std::cmp::Ordering;
use std::fmt;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InvalidVersion(pub String);

impl fmt::Display for InvalidVersion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "invalid version: {}", self.0)
    }
}

impl std::error::Error for InvalidVersion {}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum PreLabel {
    A,
    B,
    Rc,
}

impl PreLabel {
    fn from_token(token: &str) -> Option<PreLabel> {
        match token.to_ascii_lowercase().as_str() {
            "a" | "alpha" => Some(PreLabel::A),
            "b" | "beta" => Some(PreLabel::B),
            "c" | "rc" | "pre" | "preview" => Some(PreLabel::Rc),
            _ => None,
        }
    }

    fn as_str(&self) -> &'static str {
        match self {
            PreLabel::A => "a",
            PreLabel::B => "b",
            PreLabel::Rc => "rc",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum SemLevel {
    Major,
    Minor,
    Patch,
}

#[derive(Debug, Clone)]
pub struct Version {
    epoch: u64,
    release: Vec<u64>,
    pre: Option<(PreLabel, u64)>,
    post: Option<u64>,
    dev: Option<u64>,
    local: Option<String>,
    fixed_letter_post_release: bool,
}

lazy_static! {
    static ref SP_DASH: Regex = Regex::new(" SP-").unwrap();
    static ref UPDATE_STYLE: Regex =
        Regex::new(r"(?i)(\d{1,3})u(\d{1,4})(?:[-_.]?b(\d{1,3}))?").unwrap();
    static ref DASH_P: Regex = Regex::new(r"-p(\d+)$").unwrap();
    static ref DASH_PREVIEW: Regex = Regex::new(r"-preview-(\d+)").unwrap();
    static ref DASH_EARLY_ACCESS: Regex = Regex::new(r"-early-access-(\d+)").unwrap();
    static ref DASH_PRE: Regex = Regex::new(r"-pre-(\d+)").unwrap();
    static ref DASH_BETA_RC: Regex = Regex::new(r"-beta[-.]rc(\d+)").unwrap();
    static ref LEADING_PRE: Regex = Regex::new(r"^pre-(.*)").unwrap();
    static ref RC_DOT: Regex = Regex::new(r"^rc(\d+)\.").unwrap();
    static ref POST_P: Regex = Regex::new(r"^p(\d+)$").unwrap();
    static ref LEADING_NON_DIGIT: Regex = Regex::new(r"^[^0-9]+").unwrap();
    static ref UNDERSCORE_NUMERIC: Regex = Regex::new(r"^(?:\d+_)+(?:\d+)").unwrap();
    static ref LAST_CHAR_FIX: Regex = Regex::new(r"(\d)([a-zA-Z])$").unwrap();
    static ref VERSION_RE: Regex = Regex::new(
        r#"(?xi)
        ^\s*v?
        (?:(?P<epoch>[0-9]+)!)?
        (?P<release>[0-9]+(?:\.[0-9]+)*)
        (?:
            [-_.]?
            (?P<pre_l>alpha|beta|preview|pre|a|b|c|rc)
            [-_.]?
            (?P<pre_n>[0-9]+)?
        )?
        (?:
            (?:-(?P<post_n1>[0-9]+))
            |
            (?:
                [-_.]?
                (?P<post_l>post|rev|r)
                [-_.]?
                (?P<post_n2>[0-9]+)?
            )
        )?
        (?:
            [-_.]?
            (?P<dev_l>dev)
            [-_.]?
            (?P<dev_n>[0-9]+)?
        )?
        (?:\+(?P<local>[a-z0-9]+(?:[-_.][a-z0-9]+)*))?
        \s*$
        "#
    )
    .unwrap();
    pub static ref FALLBACK_SEARCH: Regex = Regex::new(r"(\d+([.][0-9x]+)+(rc\d?)?)").unwrap();
}

fn special_cases_transformation(version: &str) -> String {
    let version = SP_DASH.replace_all(version, ".post").into_owned();
    UPDATE_STYLE
        .replace_all(&version, |caps: &regex::Captures| {
            let major = &caps[1];
            let update = &caps[2];
            if let Some(build) = caps.get(3) {
                if let Ok(build_int) = build.as_str().parse::<u64>() {
                    return format!("{major}.{update}.post{build_int}");
                }
            }
            format!("{major}.{update}")
        })
        .into_owned()
}

fn join_dashed_number_status(version: &str) -> String {
    let v = DASH_P.replace(version, "-post$1");
    let v = DASH_PREVIEW.replace(&v, "-pre$1");
    let v = DASH_EARLY_ACCESS.replace(&v, "-alpha$1");
    let v = DASH_PRE.replace(&v, "-pre$1");
    let v = DASH_BETA_RC.replace(&v, "-beta$1");
    let v = LEADING_PRE.replace(&v, "$1-pre0");
    v.into_owned()
}

fn part_to_pypi(part: &str) -> Option<String> {
    match part {
        "devel" | "test" | "dev" => return Some("dev0".to_string()),
        "alpha" => return Some("a0".to_string()),
        "beta" => return Some("b0".to_string()),
        "rc" | "preview" | "pre" => return Some("rc0".to_string()),
        _ => {}
    }

    if RC_DOT.is_match(part) {
        let sub_parts: Vec<&str> = part.split('.').collect();
        let mut out = sub_parts[0].to_string();
        for sub in &sub_parts[1..] {
            if !sub.is_empty() && sub.chars().all(|c| c.is_ascii_digit()) {
                out.push_str(".post");
                out.push_str(sub);
            }
        }
        return Some(out);
    }

    if let Some(caps) = POST_P.captures(part) {
        return Some(format!("post{}", &caps[1]));
    }

    if !part.is_empty() && part.chars().all(|c| c.is_ascii_alphabetic()) {
        return None;
    }

    Some(part.to_string())
}

fn filter_relevant_parts(version: &str) -> Result<String, InvalidVersion> {
    let mut parts_n: Vec<String> = version
        .split('-')
        .filter_map(part_to_pypi)
        .collect();

    if parts_n.is_empty() {
        return Err(InvalidVersion(version.to_string()));
    }

    parts_n[0] = LEADING_NON_DIGIT.replacen(&parts_n[0], 1, "").into_owned();
    parts_n.retain(|p| !p.is_empty());

    if parts_n.len() > 1
        && parts_n[0].contains('.')
        && !parts_n[1].is_empty()
        && parts_n[1].chars().all(|c| c.is_ascii_digit())
    {
        parts_n.truncate(1);
    }

    Ok(parts_n.join("."))
}

/// Sort key mirroring `packaging.version._cmpkey`: absence of a segment is
/// mapped to positive/negative infinity so that e.g. dev releases always
/// sort below their corresponding final release.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord)]
struct VersionKey {
    epoch: u64,
    release: Vec<u64>,
    pre: PreKey,
    post: PostKey,
    dev: DevKey,
    local: LocalKey,
}

#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord)]
enum PreKey {
    NegInf,
    Value(PreLabel, u64),
    Inf,
}

#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord)]
enum PostKey {
    NegInf,
    Value(u64),
}

#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord)]
enum DevKey {
    Value(u64),
    Inf,
}

#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord)]
enum LocalPart {
    Str(String),
    Num(u64),
}

#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord)]
enum LocalKey {
    NegInf,
    Value(Vec<LocalPart>),
}

fn local_parts(local: &str) -> Vec<LocalPart> {
    local
        .split(['-', '_', '.'])
        .map(|seg| {
            if !seg.is_empty() && seg.chars().all(|c| c.is_ascii_digit()) {
                LocalPart::Num(seg.parse().unwrap_or(0))
            } else {
                LocalPart::Str(seg.to_ascii_lowercase())
            }
        })
        .collect()
}

fn trimmed_release(release: &[u64]) -> Vec<u64> {
    let mut r = release.to_vec();
    while r.len() > 1 && *r.last().unwrap() == 0 {
        r.pop();
    }
    r
}

fn is_date_like(n: u64) -> bool {
    let s = n.to_string();
    if s.len() != 8 {
        return false;
    }
    let year: i32 = match s[0..4].parse() {
        Ok(v) => v,
        Err(_) => return false,
    };
    let month: u32 = match s[4..6].parse() {
        Ok(v) => v,
        Err(_) => return false,
    };
    let day: u32 = match s[6..8].parse() {
        Ok(v) => v,
        Err(_) => return false,
    };
    chrono::NaiveDate::from_ymd_opt(year, month, day).is_some()
}

impl Version {
    /// Run the normalization pipeline over `raw` and parse the result as a
    /// PEP 440 version. Does not perform the "search for a version-like
    /// substring" fallback — callers that want that (holder tag
    /// sanitization) apply [`FALLBACK_SEARCH`] themselves on the original,
    /// pre-pipeline string.
    pub fn parse(raw: &str, char_fix_required: bool) -> Result<Version, InvalidVersion> {
        let v = special_cases_transformation(raw);
        let v = join_dashed_number_status(&v);
        let mut v = filter_relevant_parts(&v)?;

        let mut fixed_letter_post_release = false;
        if char_fix_required {
            if let Some(caps) = LAST_CHAR_FIX.captures(&v) {
                let digit = caps[1].to_string();
                let letter = caps[2].chars().next().unwrap();
                let whole = caps.get(0).unwrap();
                let mut replaced = String::with_capacity(v.len() + 8);
                replaced.push_str(&v[..whole.start()]);
                replaced.push_str(&digit);
                replaced.push_str(".post");
                replaced.push_str(&(letter as u32).to_string());
                v = replaced;
                fixed_letter_post_release = true;
            }
        }

        if UNDERSCORE_NUMERIC.is_match(&v) {
            v = v.replace('_', ".");
        }

        let v = v
            .split('.')
            .filter(|p| !p.eq_ignore_ascii_case("release"))
            .collect::<Vec<_>>()
            .join(".");

        let mut parsed = parse_pep440(&v)?;
        parsed.fixed_letter_post_release = fixed_letter_post_release;
        Ok(parsed)
    }

    pub fn epoch(&self) -> u64 {
        self.epoch
    }

    pub fn release(&self) -> &[u64] {
        &self.release
    }

    pub fn major(&self) -> u64 {
        self.release.first().copied().unwrap_or(0)
    }

    pub fn minor(&self) -> u64 {
        self.release.get(1).copied().unwrap_or(0)
    }

    pub fn micro(&self) -> u64 {
        self.release.get(2).copied().unwrap_or(0)
    }

    pub fn pre(&self) -> Option<(PreLabel, u64)> {
        self.pre
    }

    pub fn post(&self) -> Option<u64> {
        self.post
    }

    pub fn dev(&self) -> Option<u64> {
        self.dev
    }

    pub fn local(&self) -> Option<&str> {
        self.local.as_deref()
    }

    /// True iff the release tuple has two or more components, e.g. `5.9` vs
    /// bare `5`.
    pub fn is_semver(&self) -> bool {
        self.release.len() >= 2
    }

    /// 90+ micro component is treated as a pre-release unless it is a
    /// `YYYYMMDD`-shaped date stamp (date-stamped "stable" builds).
    pub fn is_prerelease(&self) -> bool {
        if self.major() != 0 && self.minor() != 0 && self.micro() >= 90 && !is_date_like(self.micro())
        {
            return true;
        }
        self.dev.is_some() || self.pre.is_some()
    }

    /// A minor version is "even" (a common stable-track convention) iff it
    /// is present and not odd.
    pub fn even(&self) -> bool {
        self.minor() != 0 && self.minor() % 2 == 0
    }

    pub fn sem_extract_base(&self, level: SemLevel) -> Version {
        let s = match level {
            SemLevel::Major => self.major().to_string(),
            SemLevel::Minor => format!("{}.{}", self.major(), self.minor()),
            SemLevel::Patch => format!("{}.{}.{}", self.major(), self.minor(), self.micro()),
        };
        Version::parse(&s, false).expect("numeric-only version string always parses")
    }

    fn cmp_key(&self) -> VersionKey {
        let pre = match (&self.pre, &self.dev) {
            (None, Some(_)) => PreKey::NegInf,
            (None, None) => PreKey::Inf,
            (Some((label, n)), _) => PreKey::Value(*label, *n),
        };
        let post = match self.post {
            None => PostKey::NegInf,
            Some(n) => PostKey::Value(n),
        };
        let dev = match self.dev {
            None => DevKey::Inf,
            Some(n) => DevKey::Value(n),
        };
        let local = match &self.local {
            None => LocalKey::NegInf,
            Some(s) => LocalKey::Value(local_parts(s)),
        };
        VersionKey {
            epoch: self.epoch,
            release: trimmed_release(&self.release),
            pre,
            post,
            dev,
            local,
        }
    }
}

impl PartialEq for Version {
    fn eq(&self, other: &Self) -> bool {
        self.cmp_key() == other.cmp_key()
    }
}

impl Eq for Version {}

impl PartialOrd for Version {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Version {
    fn cmp(&self, other: &Self) -> Ordering {
        self.cmp_key().cmp(&other.cmp_key())
    }
}

impl fmt::Display for Version {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.epoch != 0 {
            write!(f, "{}!", self.epoch)?;
        }
        write!(
            f,
            "{}",
            self.release
                .iter()
                .map(u64::to_string)
                .collect::<Vec<_>>()
                .join(".")
        )?;
        if let Some((label, n)) = &self.pre {
            write!(f, "{}{}", label.as_str(), n)?;
        }
        if let Some(post) = self.post {
            if self.fixed_letter_post_release {
                if let Some(c) = char::from_u32(post as u32) {
                    write!(f, "{c}")?;
                }
            } else {
                write!(f, ".post{post}")?;
            }
        }
        if let Some(dev) = self.dev {
            write!(f, ".dev{dev}")?;
        }
        if let Some(local) = &self.local {
            write!(f, "+{local}")?;
        }
        Ok(())
    }
}

fn parse_pep440(s: &str) -> Result<Version, InvalidVersion> {
    let caps = VERSION_RE
        .captures(s)
        .ok_or_else(|| InvalidVersion(s.to_string()))?;

    let epoch = caps
        .name("epoch")
        .map(|m| m.as_str().parse().unwrap_or(0))
        .unwrap_or(0);

    let release: Vec<u64> = caps["release"]
        .split('.')
        .map(|p| p.parse().unwrap_or(0))
        .collect();

    let pre = caps.name("pre_l").and_then(|m| {
        let label = PreLabel::from_token(m.as_str())?;
        let n = caps
            .name("pre_n")
            .and_then(|n| n.as_str().parse().ok())
            .unwrap_or(0);
        Some((label, n))
    });

    let post = if let Some(n1) = caps.name("post_n1") {
        Some(n1.as_str().parse().unwrap_or(0))
    } else if let Some(n2) = caps.name("post_n2") {
        Some(n2.as_str().parse().unwrap_or(0))
    } else {
        caps.name("post_l").map(|_| 0)
    };

    let dev = caps.name("dev_l").map(|_| {
        caps.name("dev_n")
            .and_then(|n| n.as_str().parse().ok())
            .unwrap_or(0)
    });

    let local = caps.name("local").map(|m| m.as_str().to_ascii_lowercase());

    Ok(Version {
        epoch,
        release,
        pre,
        post,
        dev,
        local,
        fixed_letter_post_release: false,
    })
}

#[cfg(test)]
#[path = "tests/version_tests.rs"]
mod tests;
