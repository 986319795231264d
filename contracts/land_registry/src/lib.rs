#![no_std]
use soroban_sdk::{
    contract, contractimpl, log, symbol_short, token, Address, BytesN, Env, String, Vec
};

mod id;
mod storage;
mod types;

pub use types::{Error, Location, Parcel, RequestStatus};

#[contract]
pub struct LandRegistry;

#[contractimpl]
impl LandRegistry {
    /// Fixes at deploy time the token every purchase is paid in.
    pub fn __constructor(e: Env, token: Address) {
        storage::put_token(&e, &token);
    }

    /// Token set by the constructor; never changes afterwards.
    pub fn payment_token(e: Env) -> Address {
        storage::get_token(&e)
    }

    /// Deterministic parcel id. Pure; safe to call off-ledger in simulation.
    pub fn compute_id(
        e: Env,
        state: String,
        district: String,
        city: String,
        survey_number: u64,
    ) -> BytesN<32> {
        id::parcel_id(&e, &Location { state, district, city, survey_number })
    }

    /// Record a new parcel. Registration authority sits with whoever submits
    /// the transaction; the ledger only checks the id and that it is unused.
    pub fn register(
        e: Env,
        state: String,
        district: String,
        city: String,
        survey_number: u64,
        owner: Address,
        market_value: i128,
        expected_id: BytesN<32>,
    ) -> Result<BytesN<32>, Error> {
        let location = Location { state, district, city, survey_number };
        let id = id::parcel_id(&e, &location);
        if id != expected_id {
            return Err(Error::IdentityMismatch);
        }
        if market_value < 0 {
            return Err(Error::InvalidAmount);
        }
        if storage::has_parcel(&e, &id) {
            return Err(Error::AlreadyRegistered);
        }

        let parcel = Parcel {
            id: id.clone(),
            location,
            owner: owner.clone(),
            market_value,
            available: false,
            requester: None,
            status: RequestStatus::None,
        };
        storage::put_parcel(&e, &parcel);
        storage::add_holding(&e, &owner, &id);
        storage::bump_instance(&e);

        e.events().publish((symbol_short!("register"), id.clone()), (owner, market_value));
        Ok(id)
    }

    /// Current record for `id`.
    pub fn query(e: Env, id: BytesN<32>) -> Result<Parcel, Error> {
        Self::load(&e, &id)
    }

    /// Page of ids currently held by `owner`. Order is stable until the
    /// owner sells, when the last id moves into the sold one's slot.
    pub fn parcels_of(e: Env, owner: Address, start: u32, limit: u32) -> Vec<BytesN<32>> {
        storage::get_holdings(&e, &owner, start, limit)
    }

    pub fn holding_count(e: Env, owner: Address) -> u32 {
        storage::holding_count(&e, &owner)
    }

    /// Owner opens the parcel to purchase requests. Idempotent.
    pub fn make_available(e: Env, owner: Address, id: BytesN<32>) -> Result<(), Error> {
        owner.require_auth();
        let mut parcel = Self::load_owned(&e, &owner, &id)?;
        if parcel.available {
            return Ok(());
        }
        parcel.available = true;
        storage::put_parcel(&e, &parcel);

        e.events().publish((symbol_short!("listed"), id), parcel.market_value);
        Ok(())
    }

    /// Owner takes the parcel off the market, discarding any open request.
    pub fn withdraw_listing(e: Env, owner: Address, id: BytesN<32>) -> Result<(), Error> {
        owner.require_auth();
        let mut parcel = Self::load_owned(&e, &owner, &id)?;
        if !parcel.available {
            return Ok(());
        }
        parcel.unlist();
        storage::put_parcel(&e, &parcel);

        e.events().publish((symbol_short!("delisted"), id), ());
        Ok(())
    }

    /// Owner changes the asking value. Only while unlisted, so a buyer
    /// never pays a value that moved under an open request.
    pub fn revalue(
        e: Env,
        owner: Address,
        id: BytesN<32>,
        market_value: i128,
    ) -> Result<(), Error> {
        owner.require_auth();
        if market_value < 0 {
            return Err(Error::InvalidAmount);
        }
        let mut parcel = Self::load_owned(&e, &owner, &id)?;
        if parcel.available {
            return Err(Error::ParcelListed);
        }
        let previous = parcel.market_value;
        parcel.market_value = market_value;
        storage::put_parcel(&e, &parcel);

        e.events().publish((symbol_short!("revalued"), id), (previous, market_value));
        Ok(())
    }

    /// Claim the request slot. Overwrites any earlier requester.
    pub fn request_purchase(e: Env, buyer: Address, id: BytesN<32>) -> Result<(), Error> {
        buyer.require_auth();
        let mut parcel = Self::load(&e, &id)?;
        if !parcel.available {
            return Err(Error::NotAvailable);
        }
        if parcel.owner == buyer {
            return Err(Error::Unauthorized);
        }
        parcel.requester = Some(buyer.clone());
        parcel.status = RequestStatus::Pending;
        storage::put_parcel(&e, &parcel);

        e.events().publish((symbol_short!("request"), id), buyer);
        Ok(())
    }

    /// Owner answers the current request with `Approved` or `Rejected`.
    pub fn process_request(
        e: Env,
        owner: Address,
        id: BytesN<32>,
        status: RequestStatus,
    ) -> Result<(), Error> {
        owner.require_auth();
        let mut parcel = Self::load_owned(&e, &owner, &id)?;
        match status {
            RequestStatus::Approved | RequestStatus::Rejected => {}
            RequestStatus::None | RequestStatus::Pending => return Err(Error::InvalidTransition),
        }
        if parcel.requester.is_none() {
            return Err(Error::InvalidTransition);
        }
        parcel.status = status;
        storage::put_parcel(&e, &parcel);

        e.events().publish((symbol_short!("process"), id), status);
        Ok(())
    }

    /// Approved requester pays exactly `market_value` to the owner and takes
    /// the parcel. The parcel comes back unlisted.
    pub fn buy_property(
        e: Env,
        buyer: Address,
        id: BytesN<32>,
        amount: i128,
    ) -> Result<(), Error> {
        buyer.require_auth();
        let mut parcel = Self::load(&e, &id)?;
        if parcel.status != RequestStatus::Approved {
            return Err(Error::NotApproved);
        }
        if parcel.requester.as_ref() != Some(&buyer) {
            return Err(Error::Unauthorized);
        }
        if amount != parcel.market_value {
            return Err(Error::PaymentMismatch);
        }
        let seller = parcel.owner.clone();
        if amount > 0 {
            // the token contract enforces buyer.require_auth() and balance
            token::Client::new(&e, &storage::get_token(&e)).transfer(&buyer, &seller, &amount);
        }
        log!(&e, "parcel transferred", id, seller, buyer, amount);

        parcel.owner = buyer.clone();
        parcel.unlist();
        storage::put_parcel(&e, &parcel);
        storage::remove_holding(&e, &seller, &id);
        storage::add_holding(&e, &buyer, &id);
        storage::bump_instance(&e);

        e.events().publish((symbol_short!("sold"), id), (seller, buyer, amount));
        Ok(())
    }

    fn load(e: &Env, id: &BytesN<32>) -> Result<Parcel, Error> {
        storage::get_parcel(e, id).ok_or(Error::NotFound)
    }

    fn load_owned(e: &Env, caller: &Address, id: &BytesN<32>) -> Result<Parcel, Error> {
        let parcel = Self::load(e, id)?;
        if parcel.owner != *caller {
            return Err(Error::Unauthorized);
        }
        Ok(parcel)
    }
}
