use soroban_sdk::{contracterror, contracttype, Address, BytesN, String};

#[contracterror]
#[derive(Copy, Clone, Debug, Eq, PartialEq, PartialOrd, Ord)]
#[repr(u32)]
pub enum Error {
    NotFound = 1,
    IdentityMismatch = 2,
    AlreadyRegistered = 3,
    Unauthorized = 4,
    NotAvailable = 5,
    InvalidTransition = 6,
    NotApproved = 7,
    PaymentMismatch = 8,
    InvalidAmount = 9,
    ParcelListed = 10,
}

/// State of the single purchase-request slot on a parcel.
#[contracttype]
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
#[repr(u32)]
pub enum RequestStatus {
    None = 0,
    Pending = 1,
    Rejected = 2,
    Approved = 3,
}

#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Location {
    pub state: String,
    pub district: String,
    pub city: String,
    pub survey_number: u64,
}

#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Parcel {
    pub id: BytesN<32>,
    pub location: Location,
    pub owner: Address,
    pub market_value: i128,     // smallest unit of the payment token
    pub available: bool,
    pub requester: Option<Address>,
    pub status: RequestStatus,
}

impl Parcel {
    /// Drop the listing and whatever request was riding on it.
    pub fn unlist(&mut self) {
        self.available = false;
        self.requester = None;
        self.status = RequestStatus::None;
    }
}
