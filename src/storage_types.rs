use soroban_sdk::{contracttype, Address, String, Vec};

pub(crate) const DAY_IN_LEDGERS: u32 = 17280;
pub(crate) const INSTANCE_BUMP_AMOUNT: u32 = 7 * DAY_IN_LEDGERS;
pub(crate) const INSTANCE_LIFETIME_THRESHOLD: u32 = INSTANCE_BUMP_AMOUNT - DAY_IN_LEDGERS;
pub(crate) const PERSISTENT_BUMP_AMOUNT: u32 = 30 * DAY_IN_LEDGERS;
pub(crate) const PERSISTENT_LIFETIME_THRESHOLD: u32 = PERSISTENT_BUMP_AMOUNT - DAY_IN_LEDGERS;

/// Upper bound on authors plus contributors. Creation writes one directory entry per member.
pub const MAX_ROSTER_SIZE: u32 = 32;

/// Fund accounting for a single attestation.
///
/// `sum(unclaimed) + claimed == received - truncation_loss - forfeited` holds after
/// every invocation. A roster member's unclaimed balance is `per_member` minus the
/// member's checkpoint, so a donation touches no per-member entry.
#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Accounting {
    /// Every donated amount ever accepted, remainders included.
    pub received: i128,
    /// Running total of the share credited to every roster member.
    pub per_member: i128,
    pub claimed: i128,
    /// Integer-division remainders that were never assigned to anyone.
    pub truncation_loss: i128,
    /// Balances burned by `revoke_affiliation`.
    pub forfeited: i128,
}

#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct AttestationRecord {
    pub id: u64,
    pub creator: Address,
    pub created_at: u64,
    pub content_pointer: String,
    pub related_ids: Vec<u64>,
    pub tags: Vec<String>,
    pub authors: Vec<Address>,
    pub contributors: Vec<Address>,
    pub signed: Vec<Address>,
    pub is_activated: bool,
    pub co_publish_threshold: i128,
    pub co_publishers: Vec<Address>,
    pub upvote_count: u32,
    pub accounting: Accounting,
}

#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct UserProfile {
    pub name: String,
    /// In the order this identity was first linked to each attestation.
    pub attestations: Vec<u64>,
}

#[contracttype]
#[derive(Clone)]
pub enum DataKey {
    Owner,
    Token,
    AttestationCount,
    Creator(Address),
    Attestation(u64),
    User(Address),
    /// `per_member` as of the participant's last claim.
    Checkpoint(u64, Address),
    Donated(u64, Address),
    Upvote(u64, Address),
}
