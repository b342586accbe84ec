//! Batched transfers: one sender, up to a hundred recipients.
//!
//! Modern-envelope only; the body carries no scheme byte. The running sum
//! of the fee and every entry amount must stay inside the signed 64-bit
//! domain; an overflowing total is rejected, never wrapped.

use crate::codec::{ByteReader, ByteWriter};
use crate::config::{Scheme, MAX_TRANSFERS};
use crate::crypto::{Digest, PublicKey, SecretKey};
use crate::error::{CryptoError, DecodeContext, DecodeError, Error, ValidationError};
use crate::identity::Recipient;
use crate::transaction::fields::{
    check_long, check_positive_long, checked_sum, Attachment, OptionalAsset,
};
use crate::transaction::proofs::Proofs;
use crate::transaction::{body_digest, expect_marker_type_version, Transactional, TransactionType};

const MASS_TRANSFER_VERSION: u8 = 1;

/// One recipient-amount pair inside a mass transfer.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct MassTransferEntry {
    pub recipient: Recipient,
    pub amount: u64,
}

impl MassTransferEntry {
    fn write_to(&self, w: &mut ByteWriter) {
        self.recipient.write_to(w);
        w.write_u64(self.amount);
    }

    fn read_from(r: &mut ByteReader<'_>) -> Result<Self, DecodeError> {
        Ok(Self {
            recipient: Recipient::read_from(r)?,
            amount: r.read_u64()?,
        })
    }
}

#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct MassTransferWithProofs {
    pub version: u8,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<Digest>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub proofs: Option<Proofs>,
    pub sender_pk: PublicKey,
    pub asset: OptionalAsset,
    pub transfers: Vec<MassTransferEntry>,
    pub timestamp: u64,
    pub fee: u64,
    pub attachment: Attachment,
}

impl MassTransferWithProofs {
    pub fn new(
        sender_pk: PublicKey,
        asset: OptionalAsset,
        transfers: Vec<MassTransferEntry>,
        timestamp: u64,
        fee: u64,
        attachment: Attachment,
    ) -> Self {
        Self {
            version: MASS_TRANSFER_VERSION,
            id: None,
            proofs: None,
            sender_pk,
            asset,
            transfers,
            timestamp,
            fee,
            attachment,
        }
    }

    pub fn unmarshal_binary(data: &[u8], scheme: Scheme) -> Result<Self, Error> {
        let mut r = ByteReader::new(data);
        expect_marker_type_version(
            &mut r,
            "mass transfer transaction",
            TransactionType::MassTransfer,
            MASS_TRANSFER_VERSION,
        )?;
        let sender_pk = PublicKey::new(r.read_array()?);
        let asset = OptionalAsset::read_from(&mut r)?;
        let count = r.read_u16()? as usize;
        if count > MAX_TRANSFERS {
            return Err(DecodeError::LimitExceeded {
                entity: "mass transfer entries",
                limit: MAX_TRANSFERS,
                got: count,
            }
            .into());
        }
        let mut transfers = Vec::with_capacity(count);
        for _ in 0..count {
            transfers.push(
                MassTransferEntry::read_from(&mut r)
                    .ctx("failed to unmarshal mass transfer entry from bytes")?,
            );
        }
        let timestamp = r.read_u64()?;
        let fee = r.read_u64()?;
        let attachment = Attachment::read_from(&mut r)?;
        let proofs = Proofs::read_from(&mut r)
            .ctx("failed to unmarshal mass transfer transaction from bytes")?;
        r.expect_end()?;

        let mut tx = Self::new(sender_pk, asset, transfers, timestamp, fee, attachment);
        tx.proofs = Some(proofs);
        tx.generate_id(scheme)?;
        Ok(tx)
    }

    /// Fee plus every entry amount, rejected on signed-64 overflow.
    pub fn total_outgoing(&self) -> Result<u64, ValidationError> {
        let mut total = self.fee;
        for entry in &self.transfers {
            total = checked_sum("fee and transfer amounts", total, entry.amount)?;
        }
        Ok(total)
    }
}

impl Transactional for MassTransferWithProofs {
    fn tx_type(&self) -> TransactionType {
        TransactionType::MassTransfer
    }

    fn version(&self) -> u8 {
        self.version
    }

    fn id(&self) -> Option<&Digest> {
        self.id.as_ref()
    }

    fn body_bytes(&self, _scheme: Scheme) -> Result<Vec<u8>, Error> {
        let mut w = ByteWriter::new();
        w.write_u8(0);
        w.write_u8(TransactionType::MassTransfer.to_byte());
        w.write_u8(self.version);
        w.write_bytes(self.sender_pk.as_bytes());
        self.asset.write_to(&mut w);
        w.write_u16(self.transfers.len() as u16);
        for entry in &self.transfers {
            entry.write_to(&mut w);
        }
        w.write_u64(self.timestamp);
        w.write_u64(self.fee);
        self.attachment.write_to(&mut w);
        Ok(w.into_vec())
    }

    fn sign(&mut self, scheme: Scheme, secret_key: &SecretKey) -> Result<(), Error> {
        let body = self.body_bytes(scheme)?;
        let mut proofs = self.proofs.take().unwrap_or_default();
        proofs.sign(secret_key, &body);
        self.proofs = Some(proofs);
        self.id = Some(body_digest(&body));
        Ok(())
    }

    fn verify(&self, scheme: Scheme, public_key: &PublicKey) -> Result<bool, Error> {
        let proofs = self
            .proofs
            .as_ref()
            .ok_or(CryptoError::MissingProofs("mass transfer transaction"))?;
        let body = self.body_bytes(scheme)?;
        Ok(proofs.verify(public_key, &body)?)
    }

    fn generate_id(&mut self, scheme: Scheme) -> Result<(), Error> {
        if self.id.is_none() {
            let body = self.body_bytes(scheme)?;
            self.id = Some(body_digest(&body));
        }
        Ok(())
    }

    fn validate(&self, _scheme: Scheme) -> Result<(), ValidationError> {
        if self.transfers.len() > MAX_TRANSFERS {
            return Err(ValidationError::TooMany {
                field: "mass transfer entries",
                count: self.transfers.len(),
                max: MAX_TRANSFERS,
            });
        }
        check_positive_long("fee", self.fee)?;
        check_long("timestamp", self.timestamp)?;
        self.attachment.valid()?;
        for entry in &self.transfers {
            check_long("transfer amount", entry.amount)?;
            entry.recipient.valid()?;
        }
        self.total_outgoing()?;
        Ok(())
    }

    fn marshal_binary(&self, scheme: Scheme) -> Result<Vec<u8>, Error> {
        let proofs = self
            .proofs
            .as_ref()
            .ok_or(CryptoError::MissingProofs("mass transfer transaction"))?;
        let mut w = ByteWriter::new();
        w.write_bytes(&self.body_bytes(scheme)?);
        proofs.write_to(&mut w);
        Ok(w.into_vec())
    }
}
