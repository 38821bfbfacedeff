// Ticket number and QR payload generation
//
// The ticket number is the human-presentable identifier printed on the
// ticket; the QR payload is a bearer credential and must be unpredictable,
// so both carry a random component rather than a sequence. Uniqueness is
// enforced by the datastore; collisions surface at insert and the caller
// regenerates.

use chrono::NaiveDate;
use rand::Rng;

pub const TICKET_NUMBER_PREFIX: &str = "SP";

const SUFFIX_LEN: usize = 6;
// Uppercase alphabet without 0/O, 1/I/L: the number gets read out loud and
// typed at entrances.
const SUFFIX_ALPHABET: &[u8] = b"23456789ABCDEFGHJKMNPQRSTUVWXYZ";
const QR_PAYLOAD_BYTES: usize = 32;

pub fn ticket_number(date: NaiveDate, rng: &mut impl Rng) -> String {
    let mut suffix = String::with_capacity(SUFFIX_LEN);
    for _ in 0..SUFFIX_LEN {
        let idx = rng.gen_range(0..SUFFIX_ALPHABET.len());
        suffix.push(SUFFIX_ALPHABET[idx] as char);
    }
    format!(
        "{}-{}-{}",
        TICKET_NUMBER_PREFIX,
        date.format("%Y%m%d"),
        suffix
    )
}

pub fn qr_payload(rng: &mut impl Rng) -> String {
    let mut bytes = [0u8; QR_PAYLOAD_BYTES];
    rng.fill(&mut bytes[..]);
    let mut out = String::with_capacity(QR_PAYLOAD_BYTES * 2);
    for byte in bytes {
        out.push_str(&format!("{byte:02x}"));
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;
    use std::collections::HashSet;

    #[test]
    fn ticket_number_has_prefix_date_and_suffix() {
        let date = NaiveDate::from_ymd_opt(2026, 8, 6).expect("date");
        let mut rng = StdRng::seed_from_u64(7);
        let number = ticket_number(date, &mut rng);
        let parts: Vec<&str> = number.split('-').collect();
        assert_eq!(parts.len(), 3);
        assert_eq!(parts[0], TICKET_NUMBER_PREFIX);
        assert_eq!(parts[1], "20260806");
        assert_eq!(parts[2].len(), SUFFIX_LEN);
        assert!(parts[2]
            .bytes()
            .all(|b| SUFFIX_ALPHABET.contains(&b)));
    }

    #[test]
    fn ticket_number_suffix_avoids_ambiguous_characters() {
        let date = NaiveDate::from_ymd_opt(2026, 1, 1).expect("date");
        let mut rng = StdRng::seed_from_u64(42);
        for _ in 0..500 {
            let number = ticket_number(date, &mut rng);
            let suffix = number.rsplit('-').next().expect("suffix");
            for forbidden in ['0', 'O', '1', 'I', 'L'] {
                assert!(!suffix.contains(forbidden), "{number}");
            }
        }
    }

    #[test]
    fn qr_payload_is_64_lowercase_hex_chars() {
        let mut rng = StdRng::seed_from_u64(11);
        let payload = qr_payload(&mut rng);
        assert_eq!(payload.len(), QR_PAYLOAD_BYTES * 2);
        assert!(payload
            .chars()
            .all(|c| c.is_ascii_hexdigit() && !c.is_ascii_uppercase()));
    }

    #[test]
    fn qr_payloads_do_not_repeat_over_many_draws() {
        let mut rng = StdRng::seed_from_u64(13);
        let mut seen = HashSet::new();
        for _ in 0..10_000 {
            assert!(seen.insert(qr_payload(&mut rng)));
        }
    }
}
