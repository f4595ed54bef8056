//! Clock-driven stand-in for a live founder chat.
//!
//! Nothing here touches the network or spawns timers. The caller advances a
//! virtual clock and receives whatever messages fell due in that window.

use chrono::{Duration as ChronoDuration, NaiveDateTime};
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tracing::debug;

/// Delay between creation and the first (welcome) message.
pub const CONNECT_DELAY: Duration = Duration::from_secs(1);
/// Online counter shown right after connecting.
pub const INITIAL_ONLINE: u32 = 12;

const MIN_INTERVAL_MS: u64 = 5_000;
const MAX_INTERVAL_MS: u64 = 10_000;
/// Most messages a single `advance` replays; older slots are dropped.
const MAX_BURST: usize = 1_000;

const WELCOME: &str =
    "Welcome to the Founder's Lounge! This is a live feed of developers discussing strategy.";

const USERS: [&str; 5] = ["Alex_Dev", "Sarah_SaaS", "Mike_Product", "Growth_Guru", "CodeNinja"];

const PHRASES: [&str; 8] = [
    "Has anyone tried the new subscription model?",
    "Gemini Flash is incredibly fast for my wrapper app.",
    "What's a good churn rate for a B2B app?",
    "Just launched on Product Hunt! 🚀",
    "I'm struggling with user acquisition for my AI tool.",
    "The revenue simulator here is actually pretty accurate.",
    "Anyone want to partner up on a fitness app?",
    "Focus on distribution, not just features!",
];

const COLORS: [&str; 5] = ["bg-red-500", "bg-green-500", "bg-yellow-500", "bg-purple-500", "bg-pink-500"];

/// A chat line, either synthetic or posted locally.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct FeedMessage {
    pub id: u64,
    pub user: String,
    pub text: String,
    /// Wall-clock time of the message, `HH:MM`.
    pub timestamp: String,
    pub is_me: bool,
    pub avatar_color: String,
}

/// Seeded mock feed. Two feeds with the same seed and the same sequence of
/// `advance`/`post` calls produce identical histories.
#[derive(Debug)]
pub struct MockFeed {
    rng: ChaCha8Rng,
    started_at: NaiveDateTime,
    elapsed: Duration,
    /// Fixed once the feed connects.
    interval: Option<Duration>,
    next_due: Duration,
    online: u32,
    next_id: u64,
    history: Vec<FeedMessage>,
}

impl MockFeed {
    pub fn new(seed: u64, started_at: NaiveDateTime) -> Self {
        Self {
            rng: ChaCha8Rng::seed_from_u64(seed),
            started_at,
            elapsed: Duration::ZERO,
            interval: None,
            next_due: CONNECT_DELAY,
            online: INITIAL_ONLINE,
            next_id: 1,
            history: Vec::new(),
        }
    }

    pub fn is_connected(&self) -> bool {
        self.interval.is_some()
    }

    pub fn online(&self) -> u32 {
        self.online
    }

    /// Interval between synthetic messages, once connected.
    pub fn interval(&self) -> Option<Duration> {
        self.interval
    }

    pub fn history(&self) -> &[FeedMessage] {
        &self.history
    }

    /// Move the clock forward and return the messages that fell due, oldest first.
    ///
    /// The clock saturates at `Duration::MAX`. A window holding more than
    /// `MAX_BURST` messages returns the oldest `MAX_BURST` and skips the rest,
    /// keeping the interval phase.
    pub fn advance(&mut self, by: Duration) -> Vec<FeedMessage> {
        self.elapsed = self.elapsed.saturating_add(by);
        let mut due = Vec::new();
        // a saturated slot never falls due
        while self.next_due <= self.elapsed && self.next_due < Duration::MAX && due.len() < MAX_BURST {
            let at = self.next_due;
            let msg = match self.interval {
                None => self.connect(at),
                Some(interval) => {
                    self.next_due = self.next_due.saturating_add(interval);
                    self.synthetic(at)
                }
            };
            due.push(msg);
        }
        if let Some(interval) = self.interval {
            if self.next_due <= self.elapsed && self.next_due < Duration::MAX {
                self.skip_missed(interval);
            }
        }
        self.history.extend(due.iter().cloned());
        due
    }

    /// Post a message as the local user. Blank input is ignored.
    pub fn post(&mut self, text: &str) -> Option<FeedMessage> {
        if text.trim().is_empty() {
            return None;
        }
        let msg = FeedMessage {
            id: self.take_id(),
            user: "You".to_string(),
            text: text.to_string(),
            timestamp: self.timestamp(self.elapsed),
            is_me: true,
            avatar_color: "bg-blue-600".to_string(),
        };
        self.history.push(msg.clone());
        Some(msg)
    }

    fn connect(&mut self, at: Duration) -> FeedMessage {
        let ms = self.rng.gen_range(MIN_INTERVAL_MS..MAX_INTERVAL_MS);
        let interval = Duration::from_millis(ms);
        self.interval = Some(interval);
        self.next_due = at.saturating_add(interval);
        debug!(interval_ms = ms, "mock feed connected");
        FeedMessage {
            id: self.take_id(),
            user: "System".to_string(),
            text: WELCOME.to_string(),
            timestamp: self.timestamp(at),
            is_me: false,
            avatar_color: "bg-cyan-600".to_string(),
        }
    }

    /// Move `next_due` to the first slot after `elapsed`.
    fn skip_missed(&mut self, interval: Duration) {
        let step = interval.as_nanos();
        let behind = (self.elapsed - self.next_due).as_nanos();
        let skipped = behind / step + 1;
        let target = self
            .next_due
            .as_nanos()
            .saturating_add(skipped.saturating_mul(step));
        debug!(skipped = %skipped, "mock feed dropped missed messages");
        self.next_due = duration_from_nanos(target);
    }

    fn synthetic(&mut self, at: Duration) -> FeedMessage {
        let user = USERS[self.rng.gen_range(0..USERS.len())];
        let text = PHRASES[self.rng.gen_range(0..PHRASES.len())];
        let color = COLORS[self.rng.gen_range(0..COLORS.len())];
        if self.rng.gen_bool(0.5) {
            self.online = self.online.saturating_add(1);
        } else {
            self.online = self.online.saturating_sub(1).max(1);
        }
        FeedMessage {
            id: self.take_id(),
            user: user.to_string(),
            text: text.to_string(),
            timestamp: self.timestamp(at),
            is_me: false,
            avatar_color: color.to_string(),
        }
    }

    fn take_id(&mut self) -> u64 {
        let id = self.next_id;
        self.next_id += 1;
        id
    }

    fn timestamp(&self, at: Duration) -> String {
        let offset = ChronoDuration::milliseconds(i64::try_from(at.as_millis()).unwrap_or(i64::MAX));
        self.started_at
            .checked_add_signed(offset)
            .unwrap_or(self.started_at)
            .format("%H:%M")
            .to_string()
    }
}

fn duration_from_nanos(nanos: u128) -> Duration {
    match u64::try_from(nanos / 1_000_000_000) {
        Ok(secs) => Duration::new(secs, (nanos % 1_000_000_000) as u32),
        Err(_) => Duration::MAX,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use proptest::prelude::*;

    fn start() -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2024, 3, 1)
            .unwrap()
            .and_hms_opt(9, 59, 30)
            .unwrap()
    }

    #[test]
    fn connects_after_one_second_with_welcome() {
        let mut feed = MockFeed::new(7, start());
        assert!(feed.advance(Duration::from_millis(999)).is_empty());
        assert!(!feed.is_connected());
        let msgs = feed.advance(Duration::from_millis(1));
        assert_eq!(msgs.len(), 1);
        assert_eq!(msgs[0].user, "System");
        assert!(msgs[0].text.starts_with("Welcome to the Founder's Lounge!"));
        assert_eq!(msgs[0].timestamp, "09:59");
        assert!(feed.is_connected());
        assert_eq!(feed.online(), INITIAL_ONLINE);
    }

    #[test]
    fn synthetic_messages_follow_fixed_interval() {
        let mut feed = MockFeed::new(42, start());
        feed.advance(CONNECT_DELAY);
        let interval = feed.interval().unwrap();
        assert!(interval >= Duration::from_secs(5) && interval < Duration::from_secs(10));

        assert!(feed.advance(interval - Duration::from_millis(1)).is_empty());
        let one = feed.advance(Duration::from_millis(1));
        assert_eq!(one.len(), 1);
        assert!(!one[0].is_me);
        assert!(USERS.contains(&one[0].user.as_str()));
        assert!(PHRASES.contains(&one[0].text.as_str()));
        assert!(COLORS.contains(&one[0].avatar_color.as_str()));

        let burst = feed.advance(interval * 3);
        assert_eq!(burst.len(), 3);
        assert_eq!(feed.history().len(), 5);
    }

    #[test]
    fn same_seed_same_history() {
        let mut a = MockFeed::new(3, start());
        let mut b = MockFeed::new(3, start());
        let ma = a.advance(Duration::from_secs(120));
        let mb = b.advance(Duration::from_secs(120));
        assert_eq!(ma, mb);
        assert_eq!(a.online(), b.online());
    }

    #[test]
    fn ids_increase_and_posts_interleave() {
        let mut feed = MockFeed::new(1, start());
        feed.advance(CONNECT_DELAY);
        assert!(feed.post("   ").is_none());
        let mine = feed.post("Shipping my MVP today").unwrap();
        assert!(mine.is_me);
        assert_eq!(mine.user, "You");
        feed.advance(Duration::from_secs(30));
        let ids: Vec<u64> = feed.history().iter().map(|m| m.id).collect();
        assert!(ids.windows(2).all(|w| w[0] < w[1]));
        assert_eq!(feed.history()[1], mine);
    }

    #[test]
    fn huge_jump_is_capped_and_keeps_running() {
        let mut feed = MockFeed::new(9, start());
        let msgs = feed.advance(Duration::MAX);
        assert_eq!(msgs.len(), MAX_BURST);
        assert_eq!(msgs[0].user, "System");
        // the clock is pinned at its maximum, so nothing else can fall due
        assert!(feed.advance(Duration::from_secs(60)).is_empty());
        assert!(feed.advance(Duration::MAX).is_empty());
        assert!(feed.post("still here").is_some());
        assert_eq!(feed.history().len(), MAX_BURST + 1);
    }

    #[test]
    fn long_window_skips_to_next_slot() {
        let mut feed = MockFeed::new(5, start());
        feed.advance(CONNECT_DELAY);
        let interval = feed.interval().unwrap();
        let msgs = feed.advance(interval * (MAX_BURST as u32 + 10));
        assert_eq!(msgs.len(), MAX_BURST);
        // phase is kept: the next slot is one interval after the last skipped one
        assert!(feed.advance(interval - Duration::from_millis(1)).is_empty());
        assert_eq!(feed.advance(Duration::from_millis(1)).len(), 1);
    }

    #[test]
    fn feed_message_json_roundtrip() {
        let mut feed = MockFeed::new(11, start());
        let msgs = feed.advance(Duration::from_secs(20));
        let text = serde_json::to_string(&msgs).unwrap();
        assert!(text.contains("\"is_me\":false"));
        let back: Vec<FeedMessage> = serde_json::from_str(&text).unwrap();
        assert_eq!(back, msgs);
    }

    proptest! {
        #[test]
        fn message_count_matches_clock(seed in 0u64..1000, secs in 1u64..600) {
            let mut feed = MockFeed::new(seed, start());
            let msgs = feed.advance(Duration::from_secs(secs));
            let interval = feed.interval().unwrap();
            let after_connect = Duration::from_secs(secs) - CONNECT_DELAY;
            let expected = 1 + (after_connect.as_millis() / interval.as_millis()) as usize;
            prop_assert_eq!(msgs.len(), expected);
            prop_assert!(feed.online() >= 1);
        }
    }
}
