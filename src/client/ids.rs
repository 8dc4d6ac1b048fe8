use rand::Rng;

const ALPHABET: &[u8] = b"0123456789abcdefghijklmnopqrstuvwxyz";
const SUFFIX_LEN: usize = 6;

/// Source of ids for records that arrive without one.
///
/// Any `FnMut() -> String` closure works, which keeps tests deterministic:
///
/// ```
/// use compressor_tracker::client::Normalizer;
///
/// let mut n = 0;
/// let mut normalizer = Normalizer::with_ids(move || {
///     n += 1;
///     format!("gen-{n}")
/// });
/// let record = normalizer.client(&serde_json::json!({}));
/// assert_eq!(record.id, "gen-1");
/// ```
pub trait IdGenerator {
    fn next_id(&mut self) -> String;
}

impl<F> IdGenerator for F
where
    F: FnMut() -> String,
{
    fn next_id(&mut self) -> String {
        self()
    }
}

/// Random `unknown-xxxxxx` ids (six lowercase base-36 characters).
#[derive(Debug, Default, Clone, Copy)]
pub struct RandomIds;

impl IdGenerator for RandomIds {
    fn next_id(&mut self) -> String {
        let mut rng = rand::rng();
        let suffix: String = (0..SUFFIX_LEN)
            .map(|_| ALPHABET[rng.random_range(0..ALPHABET.len())] as char)
            .collect();
        format!("unknown-{suffix}")
    }
}
