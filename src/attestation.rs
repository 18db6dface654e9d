//! Per-attestation state machine: signatures, activation, donations and claims.
//!
//! A record starts `Pending` and becomes `Active` once every roster member has signed.
//! Donations, claims and upvotes are accepted in both states.

use soroban_sdk::{log, token, Address, Env, Vec};

use crate::events;
use crate::registry;
use crate::storage_types::{
    AttestationRecord, DataKey, PERSISTENT_BUMP_AMOUNT, PERSISTENT_LIFETIME_THRESHOLD,
};
use crate::Error;

pub(crate) fn bump_persistent(e: &Env, key: &DataKey) {
    e.storage()
        .persistent()
        .extend_ttl(key, PERSISTENT_LIFETIME_THRESHOLD, PERSISTENT_BUMP_AMOUNT);
}

pub(crate) fn load_record(e: &Env, id: u64) -> Result<AttestationRecord, Error> {
    e.storage()
        .persistent()
        .get(&DataKey::Attestation(id))
        .ok_or(Error::AttestationNotFound)
}

pub(crate) fn save_record(e: &Env, record: &AttestationRecord) {
    let key = DataKey::Attestation(record.id);
    e.storage().persistent().set(&key, record);
    bump_persistent(e, &key);
}

fn is_participant(record: &AttestationRecord, who: &Address) -> bool {
    record.authors.contains(who) || record.contributors.contains(who)
}

fn roster_len(record: &AttestationRecord) -> u32 {
    record.authors.len() + record.contributors.len()
}

/// Removes `index` by moving the last element into its slot. Order of the remaining
/// elements is not preserved.
fn swap_remove(list: &mut Vec<Address>, index: u32) {
    let last = list.len() - 1;
    if index != last {
        if let Some(moved) = list.get(last) {
            list.set(index, moved);
        }
    }
    list.pop_back();
}

/// `actor` is whoever's call completed the roster's signatures.
fn activate_if_complete(e: &Env, record: &mut AttestationRecord, actor: &Address) {
    if record.is_activated || record.signed.len() != roster_len(record) {
        return;
    }
    record.is_activated = true;
    events::attestation_activated(e, record.id, actor);
    log!(e, "attestation activated", record.id);
}

fn checkpoint(e: &Env, id: u64, who: &Address) -> i128 {
    e.storage()
        .persistent()
        .get(&DataKey::Checkpoint(id, who.clone()))
        .unwrap_or(0)
}

/// Share credited to `who` since its last claim; zero for anyone off the roster.
fn pending(e: &Env, record: &AttestationRecord, who: &Address) -> i128 {
    if !is_participant(record, who) {
        return 0;
    }
    record.accounting.per_member - checkpoint(e, record.id, who)
}

pub(crate) fn sign(e: &Env, caller: &Address, id: u64) -> Result<(), Error> {
    caller.require_auth();
    registry::ensure_initialized(e)?;
    let mut record = load_record(e, id)?;

    if record.is_activated {
        return Err(Error::AlreadyActivated);
    }
    if !is_participant(&record, caller) {
        return Err(Error::NotParticipant);
    }
    if record.signed.contains(caller) {
        return Err(Error::AlreadySigned);
    }

    record.signed.push_back(caller.clone());
    events::contributor_signed(e, id, caller);
    activate_if_complete(e, &mut record, caller);
    save_record(e, &record);
    Ok(())
}

/// Splits `amount` evenly over the roster with floor division. The remainder stays in the
/// contract unassigned and is recorded as truncation loss.
///
/// The ledger is settled before the token transfer pulls `amount` from the donor.
pub(crate) fn donate(e: &Env, donor: &Address, id: u64, amount: i128) -> Result<(), Error> {
    donor.require_auth();
    if amount <= 0 {
        return Err(Error::InvalidAmount);
    }
    let token = registry::token(e)?;
    registry::bump_instance(e);
    let mut record = load_record(e, id)?;

    // Credit the whole roster at once through the running per-member total
    let roster_size = i128::from(roster_len(&record));
    let share = amount / roster_size;
    let remainder = amount - share * roster_size;

    let accounting = &mut record.accounting;
    accounting.per_member = accounting
        .per_member
        .checked_add(share)
        .ok_or(Error::ArithmeticOverflow)?;
    accounting.received = accounting
        .received
        .checked_add(amount)
        .ok_or(Error::ArithmeticOverflow)?;
    accounting.truncation_loss = accounting
        .truncation_loss
        .checked_add(remainder)
        .ok_or(Error::ArithmeticOverflow)?;
    events::funds_received(e, id, donor, amount, share);

    // Promotion follows the donor's cumulative contribution
    let donated_key = DataKey::Donated(id, donor.clone());
    let donated: i128 = e.storage().persistent().get(&donated_key).unwrap_or(0);
    let donated = donated
        .checked_add(amount)
        .ok_or(Error::ArithmeticOverflow)?;
    e.storage().persistent().set(&donated_key, &donated);
    bump_persistent(e, &donated_key);

    if donated >= record.co_publish_threshold && !record.co_publishers.contains(donor) {
        record.co_publishers.push_back(donor.clone());
        events::co_publisher_added(e, id, donor, donated);
    }
    save_record(e, &record);

    token::Client::new(e, &token).transfer(donor, &e.current_contract_address(), &amount);
    Ok(())
}

/// Pays out the caller's whole unclaimed balance. The checkpoint is advanced before the
/// transfer is issued.
pub(crate) fn claim(e: &Env, caller: &Address, id: u64) -> Result<i128, Error> {
    caller.require_auth();
    let token = registry::token(e)?;
    registry::bump_instance(e);
    let mut record = load_record(e, id)?;
    if !is_participant(&record, caller) {
        return Err(Error::NotParticipant);
    }

    let amount = pending(e, &record, caller);
    if amount <= 0 {
        return Err(Error::NothingToClaim);
    }

    let key = DataKey::Checkpoint(id, caller.clone());
    e.storage()
        .persistent()
        .set(&key, &record.accounting.per_member);
    bump_persistent(e, &key);
    record.accounting.claimed = record
        .accounting
        .claimed
        .checked_add(amount)
        .ok_or(Error::ArithmeticOverflow)?;
    save_record(e, &record);
    events::funds_claimed(e, id, caller, amount);
    log!(e, "funds claimed", id, amount);

    token::Client::new(e, &token).transfer(&e.current_contract_address(), caller, &amount);
    Ok(amount)
}

pub(crate) fn upvote(e: &Env, caller: &Address, id: u64) -> Result<u32, Error> {
    caller.require_auth();
    registry::ensure_initialized(e)?;
    let mut record = load_record(e, id)?;

    let key = DataKey::Upvote(id, caller.clone());
    if e.storage().persistent().has(&key) {
        return Err(Error::AlreadyUpvoted);
    }
    record.upvote_count = record
        .upvote_count
        .checked_add(1)
        .ok_or(Error::ArithmeticOverflow)?;

    e.storage().persistent().set(&key, &true);
    bump_persistent(e, &key);
    save_record(e, &record);
    events::upvoted(e, id, caller, record.upvote_count);
    Ok(record.upvote_count)
}

pub(crate) fn set_co_publish_threshold(
    e: &Env,
    caller: &Address,
    id: u64,
    threshold: i128,
) -> Result<(), Error> {
    caller.require_auth();
    registry::ensure_initialized(e)?;
    let mut record = load_record(e, id)?;
    if !record.authors.contains(caller) {
        return Err(Error::NotAuthor);
    }
    if threshold <= 0 {
        return Err(Error::InvalidThreshold);
    }

    let old = record.co_publish_threshold;
    record.co_publish_threshold = threshold;
    save_record(e, &record);
    events::threshold_updated(e, id, caller, old, threshold);
    Ok(())
}

/// Withdraws the caller from the roster before they have signed.
///
/// Any balance already credited to the caller is burned rather than returned or
/// redistributed, and counted as forfeited.
// TODO: confirm with the product owners whether forfeited balances should be refunded to
// the revoking participant or redistributed to the remaining roster.
pub(crate) fn revoke_affiliation(e: &Env, caller: &Address, id: u64) -> Result<i128, Error> {
    caller.require_auth();
    registry::ensure_initialized(e)?;
    let mut record = load_record(e, id)?;

    if !is_participant(&record, caller) {
        return Err(Error::NotParticipant);
    }
    if record.signed.contains(caller) {
        return Err(Error::RevokeAfterSign);
    }
    if roster_len(&record) == 1 {
        return Err(Error::LastParticipant);
    }

    // Settle before leaving the roster, after which the balance reads as zero
    let forfeited = pending(e, &record, caller);
    if let Some(index) = record.authors.first_index_of(caller) {
        swap_remove(&mut record.authors, index);
    } else if let Some(index) = record.contributors.first_index_of(caller) {
        swap_remove(&mut record.contributors, index);
    }

    e.storage()
        .persistent()
        .remove(&DataKey::Checkpoint(id, caller.clone()));
    record.accounting.forfeited = record
        .accounting
        .forfeited
        .checked_add(forfeited)
        .ok_or(Error::ArithmeticOverflow)?;
    events::affiliation_revoked(e, id, caller, forfeited);
    log!(e, "affiliation revoked", id, forfeited);

    activate_if_complete(e, &mut record, caller);
    save_record(e, &record);
    Ok(forfeited)
}

pub(crate) fn unclaimed_balance(e: &Env, id: u64, who: &Address) -> i128 {
    match load_record(e, id) {
        Ok(record) => pending(e, &record, who),
        Err(_) => 0,
    }
}

pub(crate) fn donated(e: &Env, id: u64, donor: &Address) -> i128 {
    e.storage()
        .persistent()
        .get(&DataKey::Donated(id, donor.clone()))
        .unwrap_or(0)
}

pub(crate) fn has_upvoted(e: &Env, id: u64, who: &Address) -> bool {
    e.storage()
        .persistent()
        .has(&DataKey::Upvote(id, who.clone()))
}
