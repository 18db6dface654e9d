#![no_std]
use soroban_sdk::{contract, contracterror, contractimpl, Address, Env, String, Vec};

mod attestation;
mod events;
mod registry;
mod storage_types;
pub use storage_types::{Accounting, AttestationRecord, UserProfile, MAX_ROSTER_SIZE};

use registry::NewAttestation;

#[contracterror]
#[derive(Copy, Clone, Debug, Eq, PartialEq, PartialOrd, Ord)]
#[repr(u32)]
pub enum Error {
    // Configuration
    AlreadyInitialized = 1,
    NotInitialized = 2,

    // Validation
    InvalidAmount = 10,
    InvalidThreshold = 11,
    EmptyName = 12,
    EmptyRoster = 13,
    DuplicateParticipant = 14,
    EmptyContentPointer = 15,
    UnknownRelatedAttestation = 16,
    RosterTooLarge = 17,

    // Authorization
    NotAuthorizedCreator = 20,
    NotAuthor = 21,
    NotParticipant = 22,

    // State
    AttestationNotFound = 30,
    AlreadyActivated = 31,
    AlreadySigned = 32,
    AlreadyUpvoted = 33,
    NothingToClaim = 34,
    RevokeAfterSign = 35,
    LastParticipant = 36,
    UserNotRegistered = 37,

    // Accounting
    ArithmeticOverflow = 40,
}

#[contract]
pub struct KnowledgeAttestationContract;

#[contractimpl]
impl KnowledgeAttestationContract {
    /// Initialize the contract with an owner and the token donations are paid in.
    /// Only can be called once. The owner starts out as an authorized creator.
    ///
    /// # Arguments
    /// * `owner` - The principal governing the authorized creator set
    /// * `token` - Address of the SEP-41 token donations and claims move
    pub fn initialize(e: Env, owner: Address, token: Address) -> Result<(), Error> {
        registry::initialize(&e, &owner, &token)
    }

    /// Hand governance over to `new_owner`. Only callable by the current owner.
    ///
    /// # Arguments
    /// * `new_owner` - The principal taking over governance
    pub fn transfer_ownership(e: Env, new_owner: Address) -> Result<(), Error> {
        registry::transfer_ownership(&e, &new_owner)
    }

    /// Allow `principal` to create attestations. Only callable by the owner.
    ///
    /// # Arguments
    /// * `principal` - The address being granted creation rights
    pub fn add_authorized_creator(e: Env, principal: Address) -> Result<(), Error> {
        registry::add_authorized_creator(&e, &principal)
    }

    /// Revoke `principal`'s creation rights. Only callable by the owner.
    ///
    /// # Arguments
    /// * `principal` - The address losing creation rights
    pub fn remove_authorized_creator(e: Env, principal: Address) -> Result<(), Error> {
        registry::remove_authorized_creator(&e, &principal)
    }

    /// Create a new attestation and link every participant into the user directory.
    ///
    /// # Arguments
    /// * `creator` - An authorized creator
    /// * `authors` - Authors of the work; together with `contributors` they form the roster
    /// * `contributors` - Contributors of the work, disjoint from `authors`
    /// * `content_pointer` - Content-addressed reference to the off-chain metadata
    /// * `related_ids` - Earlier attestations this one quotes or extends
    /// * `tags` - Free-text labels, duplicates dropped
    /// * `co_publish_threshold` - Cumulative donation that earns co-publisher status
    ///
    /// Returns the new attestation id.
    pub fn create_attestation(
        e: Env,
        creator: Address,
        authors: Vec<Address>,
        contributors: Vec<Address>,
        content_pointer: String,
        related_ids: Vec<u64>,
        tags: Vec<String>,
        co_publish_threshold: i128,
    ) -> Result<u64, Error> {
        registry::create_attestation(
            &e,
            &creator,
            NewAttestation {
                authors,
                contributors,
                content_pointer,
                related_ids,
                tags,
                co_publish_threshold,
            },
        )
    }

    /// Record `caller`'s signature. The last roster signature activates the attestation.
    ///
    /// # Arguments
    /// * `caller` - A roster member who has not signed yet
    /// * `attestation_id` - The attestation being signed
    pub fn sign(e: Env, caller: Address, attestation_id: u64) -> Result<(), Error> {
        attestation::sign(&e, &caller, attestation_id)
    }

    /// Donate `amount` of the payment token, split evenly across the roster.
    ///
    /// Not idempotent: every call moves funds again.
    ///
    /// # Arguments
    /// * `donor` - The address paying, roster member or not
    /// * `attestation_id` - The attestation receiving the donation
    /// * `amount` - Token amount, strictly positive
    pub fn donate(e: Env, donor: Address, attestation_id: u64, amount: i128) -> Result<(), Error> {
        attestation::donate(&e, &donor, attestation_id, amount)
    }

    /// Withdraw `caller`'s unclaimed share. Returns the amount paid out.
    ///
    /// # Arguments
    /// * `caller` - A roster member with a positive unclaimed balance
    /// * `attestation_id` - The attestation the balance accrued on
    pub fn claim(e: Env, caller: Address, attestation_id: u64) -> Result<i128, Error> {
        attestation::claim(&e, &caller, attestation_id)
    }

    /// Upvote an attestation once per identity. Returns the new upvote count.
    ///
    /// # Arguments
    /// * `caller` - Any address that has not upvoted this attestation
    /// * `attestation_id` - The attestation being upvoted
    pub fn upvote(e: Env, caller: Address, attestation_id: u64) -> Result<u32, Error> {
        attestation::upvote(&e, &caller, attestation_id)
    }

    /// Change the cumulative donation required for co-publisher status. Only callable by
    /// an author. Existing co-publishers keep their status.
    ///
    /// # Arguments
    /// * `caller` - An author of the attestation
    /// * `attestation_id` - The attestation being updated
    /// * `threshold` - New threshold, strictly positive
    pub fn set_co_publish_threshold(
        e: Env,
        caller: Address,
        attestation_id: u64,
        threshold: i128,
    ) -> Result<(), Error> {
        attestation::set_co_publish_threshold(&e, &caller, attestation_id, threshold)
    }

    /// Leave the roster before signing. Returns the forfeited balance, which is burned.
    ///
    /// # Arguments
    /// * `caller` - A roster member who has not signed
    /// * `attestation_id` - The attestation being left
    pub fn revoke_affiliation(e: Env, caller: Address, attestation_id: u64) -> Result<i128, Error> {
        attestation::revoke_affiliation(&e, &caller, attestation_id)
    }

    /// Update the caller's display name. Only identities already in the directory may do so.
    ///
    /// # Arguments
    /// * `user` - The identity renaming itself
    /// * `name` - The new display name, non-empty
    pub fn update_user_name(e: Env, user: Address, name: String) -> Result<(), Error> {
        registry::update_user_name(&e, &user, name)
    }

    /// Get the number of attestations created so far
    pub fn get_attestation_count(e: Env) -> u64 {
        registry::attestation_count(&e)
    }

    /// Retrieve an attestation record
    ///
    /// # Arguments
    /// * `attestation_id` - The attestation id
    pub fn get_attestation(e: Env, attestation_id: u64) -> Result<AttestationRecord, Error> {
        attestation::load_record(&e, attestation_id)
    }

    /// Attestation ids `user` participates in, in the order they were linked.
    ///
    /// # Arguments
    /// * `user` - The participant's address
    pub fn get_user_attestations(e: Env, user: Address) -> Vec<u64> {
        registry::user_profile(&e, &user)
            .map(|profile| profile.attestations)
            .unwrap_or_else(|| Vec::new(&e))
    }

    /// Get a participant's display name, empty when unset or unknown
    ///
    /// # Arguments
    /// * `user` - The participant's address
    pub fn get_user_name(e: Env, user: Address) -> String {
        registry::user_profile(&e, &user)
            .map(|profile| profile.name)
            .unwrap_or_else(|| String::from_str(&e, ""))
    }

    /// Retrieve a participant's directory entry, if any
    ///
    /// # Arguments
    /// * `user` - The participant's address
    pub fn get_user_profile(e: Env, user: Address) -> Option<UserProfile> {
        registry::user_profile(&e, &user)
    }

    /// Get what `user` could claim right now; zero for anyone off the roster
    ///
    /// # Arguments
    /// * `attestation_id` - The attestation id
    /// * `user` - The address to look up
    pub fn get_unclaimed_balance(e: Env, attestation_id: u64, user: Address) -> i128 {
        attestation::unclaimed_balance(&e, attestation_id, &user)
    }

    /// Cumulative amount `donor` has given to an attestation.
    ///
    /// # Arguments
    /// * `attestation_id` - The attestation id
    /// * `donor` - The donor's address
    pub fn get_donated(e: Env, attestation_id: u64, donor: Address) -> i128 {
        attestation::donated(&e, attestation_id, &donor)
    }

    /// Check whether `user` has signed an attestation
    ///
    /// # Arguments
    /// * `attestation_id` - The attestation id
    /// * `user` - The address to look up
    pub fn has_signed(e: Env, attestation_id: u64, user: Address) -> Result<bool, Error> {
        Ok(attestation::load_record(&e, attestation_id)?
            .signed
            .contains(&user))
    }

    /// Check whether `user` has upvoted an attestation
    ///
    /// # Arguments
    /// * `attestation_id` - The attestation id
    /// * `user` - The address to look up
    pub fn has_upvoted(e: Env, attestation_id: u64, user: Address) -> bool {
        attestation::has_upvoted(&e, attestation_id, &user)
    }

    /// Get the upvote count of an attestation
    ///
    /// # Arguments
    /// * `attestation_id` - The attestation id
    pub fn get_upvote_count(e: Env, attestation_id: u64) -> Result<u32, Error> {
        Ok(attestation::load_record(&e, attestation_id)?.upvote_count)
    }

    /// Check whether `user` has reached co-publisher status on an attestation
    ///
    /// # Arguments
    /// * `attestation_id` - The attestation id
    /// * `user` - The address to look up
    pub fn is_co_publisher(e: Env, attestation_id: u64, user: Address) -> Result<bool, Error> {
        Ok(attestation::load_record(&e, attestation_id)?
            .co_publishers
            .contains(&user))
    }

    /// Check whether `principal` may create attestations
    ///
    /// # Arguments
    /// * `principal` - The address to look up
    pub fn is_authorized_creator(e: Env, principal: Address) -> bool {
        registry::is_authorized_creator(&e, &principal)
    }

    /// Get the governing owner
    pub fn get_owner(e: Env) -> Result<Address, Error> {
        registry::owner(&e)
    }

    /// Get the payment token address
    pub fn get_token(e: Env) -> Result<Address, Error> {
        registry::token(&e)
    }
}
