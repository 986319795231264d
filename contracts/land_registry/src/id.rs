use soroban_sdk::{xdr::ToXdr, Bytes, BytesN, Env};
use crate::types::Location;

const DOMAIN: &[u8] = b"land-registry/parcel/v1";

/// Parcel id: sha256(DOMAIN || xdr(location)).
///
/// XDR length-prefixes every string field, so ("ab", "c") and ("a", "bc")
/// never encode to the same bytes.
pub fn parcel_id(e: &Env, location: &Location) -> BytesN<32> {
    let mut buf = Bytes::from_slice(e, DOMAIN);
    buf.append(&location.clone().to_xdr(e));
    e.crypto().sha256(&buf).to_bytes()
}
