//! WHOIS domain-age lookup
//!
//! Minimal WHOIS client over TCP port 43: ask the IANA root server for
//! the TLD's registry, follow the referral once, and scan the reply for
//! a creation-date field. Registries are slow and throttle freely, so
//! every step carries its own timeout and any failure yields `None`.

use std::time::Duration;

use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::TcpStream;
use tokio::time::timeout;

const IANA_WHOIS: &str = "whois.iana.org";
const WHOIS_PORT: u16 = 43;
const STEP_TIMEOUT: Duration = Duration::from_secs(10);

/// Cap on a single WHOIS reply; real replies are a few KB, so anything
/// past this is a misbehaving server and gets cut off.
const MAX_REPLY_BYTES: u64 = 64 * 1024;

/// Field names registries use for the registration date, lowercased.
const CREATION_FIELDS: &[&str] = &[
    "creation date",
    "created",
    "registered on",
    "registration time",
    "domain registration date",
];

/// Second-level labels that act as public registry suffixes.
const REGISTRY_SECOND_LEVELS: &[&str] = &["co", "com", "org", "net", "gov", "ac", "edu"];

/// Age of the domain registration in whole days, if resolvable.
pub async fn domain_age_days(host: &str) -> Option<i64> {
    let domain = registrable_domain(host);
    let created = creation_date(&domain).await?;
    Some((Utc::now() - created).num_days())
}

/// Look up the domain's creation date via IANA referral.
async fn creation_date(domain: &str) -> Option<DateTime<Utc>> {
    let root_reply = match query(IANA_WHOIS, domain).await {
        Ok(reply) => reply,
        Err(err) => {
            tracing::warn!("WHOIS root query for {domain} failed: {err}");
            return None;
        }
    };

    // The root reply occasionally carries the date itself (some ccTLDs).
    if let Some(created) = parse_creation_date(&root_reply) {
        return Some(created);
    }

    let registry = referral_server(&root_reply)?;
    match query(&registry, domain).await {
        Ok(reply) => parse_creation_date(&reply),
        Err(err) => {
            tracing::warn!("WHOIS registry query for {domain} via {registry} failed: {err}");
            None
        }
    }
}

/// One WHOIS exchange: connect, send the query line, read to EOF.
async fn query(server: &str, domain: &str) -> std::io::Result<String> {
    let mut stream = timeout(STEP_TIMEOUT, TcpStream::connect((server, WHOIS_PORT)))
        .await
        .map_err(|_| std::io::Error::from(std::io::ErrorKind::TimedOut))??;

    timeout(
        STEP_TIMEOUT,
        stream.write_all(format!("{domain}\r\n").as_bytes()),
    )
    .await
    .map_err(|_| std::io::Error::from(std::io::ErrorKind::TimedOut))??;

    read_reply(stream).await
}

/// Read a reply to EOF, bounded by `MAX_REPLY_BYTES`.
async fn read_reply<R>(reader: R) -> std::io::Result<String>
where
    R: tokio::io::AsyncRead + Unpin,
{
    let mut reply = Vec::new();
    timeout(STEP_TIMEOUT, reader.take(MAX_REPLY_BYTES).read_to_end(&mut reply))
        .await
        .map_err(|_| std::io::Error::from(std::io::ErrorKind::TimedOut))??;

    Ok(String::from_utf8_lossy(&reply).into_owned())
}

/// Extract the `refer:` server from an IANA reply.
fn referral_server(reply: &str) -> Option<String> {
    reply.lines().find_map(|line| {
        let (key, value) = line.split_once(':')?;
        if key.trim().eq_ignore_ascii_case("refer") {
            let value = value.trim();
            (!value.is_empty()).then(|| value.to_string())
        } else {
            None
        }
    })
}

/// First creation-date field in the reply, first entry wins when the
/// registry lists several.
fn parse_creation_date(reply: &str) -> Option<DateTime<Utc>> {
    reply.lines().find_map(|line| {
        let (key, value) = line.split_once(':')?;
        let key = key.trim().to_lowercase();
        if CREATION_FIELDS.contains(&key.as_str()) {
            parse_date(value.trim())
        } else {
            None
        }
    })
}

fn parse_date(value: &str) -> Option<DateTime<Utc>> {
    if let Ok(dt) = DateTime::parse_from_rfc3339(value) {
        return Some(dt.with_timezone(&Utc));
    }
    if let Ok(dt) = NaiveDateTime::parse_from_str(value, "%Y-%m-%d %H:%M:%S") {
        return Some(dt.and_utc());
    }
    for format in ["%Y-%m-%d", "%d-%b-%Y", "%Y.%m.%d"] {
        if let Ok(date) = NaiveDate::parse_from_str(value, format) {
            return Some(date.and_hms_opt(0, 0, 0)?.and_utc());
        }
    }
    None
}

/// Reduce a host to the domain a registry will answer for. Keeps three
/// labels ahead of public second-level suffixes (co.uk and friends).
fn registrable_domain(host: &str) -> String {
    let labels: Vec<&str> = host.split('.').filter(|l| !l.is_empty()).collect();
    let keep = match labels.len() {
        0..=2 => labels.len(),
        _ if REGISTRY_SECOND_LEVELS.contains(&labels[labels.len() - 2]) => 3,
        _ => 2,
    };
    labels[labels.len() - keep..].join(".")
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Datelike;

    #[test]
    fn parses_rfc3339_creation_date() {
        let reply = "Domain Name: EXAMPLE.COM\n   Creation Date: 1995-08-14T04:00:00Z\n";
        let created = parse_creation_date(reply).unwrap();
        assert_eq!((created.year(), created.month(), created.day()), (1995, 8, 14));
    }

    #[test]
    fn parses_plain_date_formats() {
        assert!(parse_creation_date("created: 2001-02-03\n").is_some());
        assert!(parse_creation_date("Registered on: 03-Aug-1999\n").is_some());
        assert!(parse_creation_date("created: 2004.03.02\n").is_some());
        assert!(parse_creation_date("Registration Time: 2010-01-02 11:22:33\n").is_some());
    }

    #[test]
    fn first_creation_date_wins() {
        let reply = "Creation Date: 2000-01-01T00:00:00Z\nCreation Date: 2015-06-07T00:00:00Z\n";
        let created = parse_creation_date(reply).unwrap();
        assert_eq!(created.year(), 2000);
    }

    #[test]
    fn missing_creation_date_yields_none() {
        assert!(parse_creation_date("Domain Name: EXAMPLE.COM\nRegistrar: Example Inc.\n").is_none());
        assert!(parse_creation_date("Creation Date: sometime in the 90s\n").is_none());
    }

    #[test]
    fn extracts_referral_server() {
        let reply = "domain: COM\nrefer: whois.verisign-grs.com\nstatus: ACTIVE\n";
        assert_eq!(
            referral_server(reply),
            Some("whois.verisign-grs.com".to_string())
        );
        assert_eq!(referral_server("domain: COM\n"), None);
    }

    #[tokio::test]
    async fn reply_read_is_capped() {
        let oversized = vec![b'a'; MAX_REPLY_BYTES as usize + 4096];
        let reply = read_reply(oversized.as_slice()).await.unwrap();
        assert_eq!(reply.len(), MAX_REPLY_BYTES as usize);
    }

    #[tokio::test]
    async fn short_reply_reads_to_eof() {
        let reply = read_reply(&b"refer: whois.example\r\n"[..]).await.unwrap();
        assert_eq!(reply, "refer: whois.example\r\n");
    }

    #[test]
    fn reduces_host_to_registrable_domain() {
        assert_eq!(registrable_domain("example.com"), "example.com");
        assert_eq!(registrable_domain("login.secure.example.com"), "example.com");
        assert_eq!(registrable_domain("shop.example.co.uk"), "example.co.uk");
        assert_eq!(registrable_domain("localhost"), "localhost");
    }
}
