//! Durable event log consumed by off-chain indexers.
//!
//! Record events are published with topics `(kind, attestation_id)`; directory and
//! governance events use `(kind, identity)`. Renaming a kind or reshaping its data is a
//! breaking change for every consumer.

use soroban_sdk::{symbol_short, Address, Env, String, Symbol};

pub(crate) const SIGNED: Symbol = symbol_short!("signed");
pub(crate) const ACTIVATED: Symbol = symbol_short!("activated");
pub(crate) const CO_PUBLISHER_ADDED: Symbol = symbol_short!("copub_add");
pub(crate) const UPVOTED: Symbol = symbol_short!("upvoted");
pub(crate) const FUNDS_RECEIVED: Symbol = symbol_short!("funds_in");
pub(crate) const FUNDS_CLAIMED: Symbol = symbol_short!("claimed");
pub(crate) const AFFILIATION_REVOKED: Symbol = symbol_short!("revoked");
pub(crate) const THRESHOLD_UPDATED: Symbol = symbol_short!("threshold");
pub(crate) const USER_REGISTERED: Symbol = symbol_short!("user_reg");
pub(crate) const ATTESTATION_CREATED: Symbol = symbol_short!("created");
pub(crate) const ATTESTATION_ADDED_TO_USER: Symbol = symbol_short!("user_link");
pub(crate) const USER_NAME_UPDATED: Symbol = symbol_short!("user_name");
pub(crate) const CREATOR_ADDED: Symbol = symbol_short!("crtr_add");
pub(crate) const CREATOR_REMOVED: Symbol = symbol_short!("crtr_rm");
pub(crate) const OWNER_CHANGED: Symbol = symbol_short!("owner_set");

pub(crate) fn contributor_signed(e: &Env, id: u64, who: &Address) {
    e.events().publish((SIGNED, id), who.clone());
}

/// `who` is the participant whose call completed the roster's signatures.
pub(crate) fn attestation_activated(e: &Env, id: u64, who: &Address) {
    e.events()
        .publish((ACTIVATED, id), (who.clone(), e.ledger().timestamp()));
}

pub(crate) fn co_publisher_added(e: &Env, id: u64, donor: &Address, donated: i128) {
    e.events().publish((CO_PUBLISHER_ADDED, id), (donor.clone(), donated));
}

pub(crate) fn upvoted(e: &Env, id: u64, who: &Address, count: u32) {
    e.events().publish((UPVOTED, id), (who.clone(), count));
}

/// `share` is what each roster member was credited; `amount - share * roster` was lost
/// to truncation.
pub(crate) fn funds_received(e: &Env, id: u64, donor: &Address, amount: i128, share: i128) {
    e.events()
        .publish((FUNDS_RECEIVED, id), (donor.clone(), amount, share));
}

pub(crate) fn funds_claimed(e: &Env, id: u64, who: &Address, amount: i128) {
    e.events().publish((FUNDS_CLAIMED, id), (who.clone(), amount));
}

pub(crate) fn affiliation_revoked(e: &Env, id: u64, who: &Address, forfeited: i128) {
    e.events()
        .publish((AFFILIATION_REVOKED, id), (who.clone(), forfeited));
}

pub(crate) fn threshold_updated(e: &Env, id: u64, who: &Address, old: i128, new: i128) {
    e.events()
        .publish((THRESHOLD_UPDATED, id), (who.clone(), old, new));
}

pub(crate) fn attestation_created(e: &Env, id: u64, creator: &Address, content_pointer: &String) {
    e.events().publish(
        (ATTESTATION_CREATED, id),
        (creator.clone(), content_pointer.clone()),
    );
}

pub(crate) fn user_registered(e: &Env, who: &Address) {
    e.events().publish((USER_REGISTERED, who.clone()), ());
}

pub(crate) fn attestation_added_to_user(e: &Env, who: &Address, id: u64) {
    e.events()
        .publish((ATTESTATION_ADDED_TO_USER, who.clone()), id);
}

pub(crate) fn user_name_updated(e: &Env, who: &Address, name: &String) {
    e.events()
        .publish((USER_NAME_UPDATED, who.clone()), name.clone());
}

pub(crate) fn creator_added(e: &Env, principal: &Address) {
    e.events().publish((CREATOR_ADDED, principal.clone()), ());
}

pub(crate) fn creator_removed(e: &Env, principal: &Address) {
    e.events().publish((CREATOR_REMOVED, principal.clone()), ());
}

pub(crate) fn owner_changed(e: &Env, old: &Address, new: &Address) {
    e.events()
        .publish((OWNER_CHANGED, new.clone()), old.clone());
}
