use soroban_sdk::{contracttype, symbol_short, Address, BytesN, Env, IntoVal, Symbol, Val, Vec};
use crate::types::Parcel;

const DAY_IN_LEDGERS: u32 = 17_280;
const INSTANCE_BUMP: u32 = 30 * DAY_IN_LEDGERS;
const INSTANCE_THRESHOLD: u32 = INSTANCE_BUMP - DAY_IN_LEDGERS;
// Registry records are meant to outlive any single sale cycle.
const RECORD_BUMP: u32 = 120 * DAY_IN_LEDGERS;
const RECORD_THRESHOLD: u32 = RECORD_BUMP - 7 * DAY_IN_LEDGERS;

#[contracttype]
#[derive(Clone)]
pub enum DataKey {
    Parcel(BytesN<32>),
    // owner -> number of parcels held
    HoldCount(Address),
    // (owner, slot) -> parcel id, slots dense in 0..count
    HoldAt(Address, u32),
    // (owner, parcel id) -> slot
    HoldSlot(Address, BytesN<32>),
}

pub fn k_token() -> Symbol { symbol_short!("token") }

pub fn get_token(e: &Env) -> Address {
    e.storage().instance().get(&k_token()).expect("no-token")
}

pub fn put_token(e: &Env, token: &Address) {
    e.storage().instance().set(&k_token(), token);
    bump_instance(e);
}

pub fn bump_instance(e: &Env) {
    e.storage().instance().extend_ttl(INSTANCE_THRESHOLD, INSTANCE_BUMP);
}

pub fn has_parcel(e: &Env, id: &BytesN<32>) -> bool {
    e.storage().persistent().has(&DataKey::Parcel(id.clone()))
}

pub fn get_parcel(e: &Env, id: &BytesN<32>) -> Option<Parcel> {
    e.storage().persistent().get(&DataKey::Parcel(id.clone()))
}

pub fn put_parcel(e: &Env, p: &Parcel) {
    let key = DataKey::Parcel(p.id.clone());
    e.storage().persistent().set(&key, p);
    e.storage().persistent().extend_ttl(&key, RECORD_THRESHOLD, RECORD_BUMP);
}

// Holdings are one entry per (owner, parcel), so adding or removing a parcel
// touches a constant number of entries no matter how much the owner holds.

pub fn holding_count(e: &Env, owner: &Address) -> u32 {
    e.storage().persistent().get(&DataKey::HoldCount(owner.clone())).unwrap_or(0)
}

/// Ids in slots `start..start + limit`, clipped to what `owner` holds.
pub fn get_holdings(e: &Env, owner: &Address, start: u32, limit: u32) -> Vec<BytesN<32>> {
    let end = holding_count(e, owner).min(start.saturating_add(limit));
    let mut out = Vec::new(e);
    for slot in start..end {
        let id: Option<BytesN<32>> =
            e.storage().persistent().get(&DataKey::HoldAt(owner.clone(), slot));
        if let Some(id) = id {
            out.push_back(id);
        }
    }
    out
}

pub fn add_holding(e: &Env, owner: &Address, id: &BytesN<32>) {
    if e.storage().persistent().has(&DataKey::HoldSlot(owner.clone(), id.clone())) {
        return;
    }
    let n = holding_count(e, owner);
    put_persistent(e, &DataKey::HoldAt(owner.clone(), n), id);
    put_persistent(e, &DataKey::HoldSlot(owner.clone(), id.clone()), &n);
    put_persistent(e, &DataKey::HoldCount(owner.clone()), &(n + 1));
}

/// Swap-remove: the last slot moves into the freed one.
pub fn remove_holding(e: &Env, owner: &Address, id: &BytesN<32>) {
    let slot_key = DataKey::HoldSlot(owner.clone(), id.clone());
    let slot: u32 = match e.storage().persistent().get(&slot_key) {
        Some(s) => s,
        None => return,
    };
    let last = holding_count(e, owner) - 1;
    if slot != last {
        let moved: BytesN<32> = e
            .storage()
            .persistent()
            .get(&DataKey::HoldAt(owner.clone(), last))
            .expect("holding-index");
        put_persistent(e, &DataKey::HoldAt(owner.clone(), slot), &moved);
        put_persistent(e, &DataKey::HoldSlot(owner.clone(), moved), &slot);
    }
    e.storage().persistent().remove(&DataKey::HoldAt(owner.clone(), last));
    e.storage().persistent().remove(&slot_key);
    put_persistent(e, &DataKey::HoldCount(owner.clone()), &last);
}

fn put_persistent<V: IntoVal<Env, Val>>(e: &Env, key: &DataKey, v: &V) {
    e.storage().persistent().set(key, v);
    e.storage().persistent().extend_ttl(key, RECORD_THRESHOLD, RECORD_BUMP);
}
