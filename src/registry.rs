//! Authority gate, id allocation and the participant directory.

use soroban_sdk::{log, Address, Env, String, Vec};

use crate::attestation::{bump_persistent, save_record};
use crate::events;
use crate::storage_types::{
    Accounting, AttestationRecord, DataKey, UserProfile, INSTANCE_BUMP_AMOUNT,
    INSTANCE_LIFETIME_THRESHOLD, MAX_ROSTER_SIZE,
};
use crate::Error;

pub(crate) fn bump_instance(e: &Env) {
    e.storage()
        .instance()
        .extend_ttl(INSTANCE_LIFETIME_THRESHOLD, INSTANCE_BUMP_AMOUNT);
}

pub(crate) fn initialize(e: &Env, owner: &Address, token: &Address) -> Result<(), Error> {
    if e.storage().instance().has(&DataKey::Owner) {
        return Err(Error::AlreadyInitialized);
    }

    e.storage().instance().set(&DataKey::Owner, owner);
    e.storage().instance().set(&DataKey::Token, token);
    e.storage().instance().set(&DataKey::AttestationCount, &0u64);
    bump_instance(e);

    let creator_key = DataKey::Creator(owner.clone());
    e.storage().persistent().set(&creator_key, &true);
    bump_persistent(e, &creator_key);
    events::creator_added(e, owner);
    Ok(())
}

pub(crate) fn owner(e: &Env) -> Result<Address, Error> {
    e.storage()
        .instance()
        .get(&DataKey::Owner)
        .ok_or(Error::NotInitialized)
}

/// Fails with `NotInitialized` until `initialize` has run, and keeps the instance alive.
pub(crate) fn ensure_initialized(e: &Env) -> Result<(), Error> {
    owner(e)?;
    bump_instance(e);
    Ok(())
}

pub(crate) fn token(e: &Env) -> Result<Address, Error> {
    e.storage()
        .instance()
        .get(&DataKey::Token)
        .ok_or(Error::NotInitialized)
}

pub(crate) fn attestation_count(e: &Env) -> u64 {
    e.storage()
        .instance()
        .get(&DataKey::AttestationCount)
        .unwrap_or(0)
}

pub(crate) fn transfer_ownership(e: &Env, new_owner: &Address) -> Result<(), Error> {
    let current = owner(e)?;
    current.require_auth();

    e.storage().instance().set(&DataKey::Owner, new_owner);
    bump_instance(e);
    events::owner_changed(e, &current, new_owner);
    Ok(())
}

pub(crate) fn is_authorized_creator(e: &Env, principal: &Address) -> bool {
    e.storage()
        .persistent()
        .get(&DataKey::Creator(principal.clone()))
        .unwrap_or(false)
}

pub(crate) fn add_authorized_creator(e: &Env, principal: &Address) -> Result<(), Error> {
    owner(e)?.require_auth();
    bump_instance(e);

    let key = DataKey::Creator(principal.clone());
    e.storage().persistent().set(&key, &true);
    bump_persistent(e, &key);
    events::creator_added(e, principal);
    Ok(())
}

pub(crate) fn remove_authorized_creator(e: &Env, principal: &Address) -> Result<(), Error> {
    owner(e)?.require_auth();
    bump_instance(e);

    e.storage()
        .persistent()
        .remove(&DataKey::Creator(principal.clone()));
    events::creator_removed(e, principal);
    Ok(())
}

/// Parameters of a new attestation, as submitted by an authorized creator.
pub(crate) struct NewAttestation {
    pub authors: Vec<Address>,
    pub contributors: Vec<Address>,
    pub content_pointer: String,
    pub related_ids: Vec<u64>,
    pub tags: Vec<String>,
    pub co_publish_threshold: i128,
}

pub(crate) fn create_attestation(
    e: &Env,
    creator: &Address,
    params: NewAttestation,
) -> Result<u64, Error> {
    creator.require_auth();
    ensure_initialized(e)?;

    // Check caller is an authorized creator
    if !is_authorized_creator(e, creator) {
        return Err(Error::NotAuthorizedCreator);
    }
    let count = attestation_count(e);

    // Validate submission
    if params.content_pointer.len() == 0 {
        return Err(Error::EmptyContentPointer);
    }
    if params.co_publish_threshold <= 0 {
        return Err(Error::InvalidThreshold);
    }
    let roster = validate_roster(e, &params.authors, &params.contributors)?;
    for related in params.related_ids.iter() {
        if related >= count {
            return Err(Error::UnknownRelatedAttestation);
        }
    }

    // Drop repeated tags, keeping first occurrence
    let mut tags = Vec::new(e);
    for tag in params.tags.iter() {
        if !tags.contains(&tag) {
            tags.push_back(tag);
        }
    }

    // Allocate id
    let id = count;
    let next = count.checked_add(1).ok_or(Error::ArithmeticOverflow)?;
    e.storage().instance().set(&DataKey::AttestationCount, &next);

    let record = AttestationRecord {
        id,
        creator: creator.clone(),
        created_at: e.ledger().timestamp(),
        content_pointer: params.content_pointer,
        related_ids: params.related_ids,
        tags,
        authors: params.authors,
        contributors: params.contributors,
        signed: Vec::new(e),
        is_activated: false,
        co_publish_threshold: params.co_publish_threshold,
        co_publishers: Vec::new(e),
        upvote_count: 0,
        accounting: Accounting {
            received: 0,
            per_member: 0,
            claimed: 0,
            truncation_loss: 0,
            forfeited: 0,
        },
    };
    save_record(e, &record);
    events::attestation_created(e, id, creator, &record.content_pointer);
    log!(e, "attestation created", id, roster.len());

    // Register every participant in the directory
    for participant in roster.iter() {
        link_participant(e, &participant, id);
    }

    Ok(id)
}

/// Authors followed by contributors. Rejects an empty or oversized roster and any identity
/// listed twice.
fn validate_roster(
    e: &Env,
    authors: &Vec<Address>,
    contributors: &Vec<Address>,
) -> Result<Vec<Address>, Error> {
    let size = authors.len() + contributors.len();
    if size == 0 {
        return Err(Error::EmptyRoster);
    }
    if size > MAX_ROSTER_SIZE {
        return Err(Error::RosterTooLarge);
    }

    let mut roster: Vec<Address> = Vec::new(e);
    for participant in authors.iter().chain(contributors.iter()) {
        if roster.contains(&participant) {
            return Err(Error::DuplicateParticipant);
        }
        roster.push_back(participant);
    }
    Ok(roster)
}

fn link_participant(e: &Env, participant: &Address, id: u64) {
    let key = DataKey::User(participant.clone());
    let mut profile = match e.storage().persistent().get::<_, UserProfile>(&key) {
        Some(profile) => profile,
        None => {
            events::user_registered(e, participant);
            UserProfile {
                name: String::from_str(e, ""),
                attestations: Vec::new(e),
            }
        }
    };
    profile.attestations.push_back(id);
    e.storage().persistent().set(&key, &profile);
    bump_persistent(e, &key);
    events::attestation_added_to_user(e, participant, id);
}

pub(crate) fn user_profile(e: &Env, user: &Address) -> Option<UserProfile> {
    e.storage().persistent().get(&DataKey::User(user.clone()))
}

pub(crate) fn update_user_name(e: &Env, user: &Address, name: String) -> Result<(), Error> {
    user.require_auth();
    ensure_initialized(e)?;
    if name.len() == 0 {
        return Err(Error::EmptyName);
    }

    let key = DataKey::User(user.clone());
    let mut profile: UserProfile = e
        .storage()
        .persistent()
        .get(&key)
        .ok_or(Error::UserNotRegistered)?;
    profile.name = name;
    e.storage().persistent().set(&key, &profile);
    bump_persistent(e, &key);
    events::user_name_updated(e, user, &profile.name);
    Ok(())
}
