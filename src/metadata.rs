use crate::chunks::bkgd::{self, bKGDChunk};
use crate::chunks::chrm::{self, cHRMChunk};
use crate::chunks::exif::{self, eXIfChunk};
use crate::chunks::gama::{self, gAMAChunk};
use crate::chunks::hist::{self, hISTChunk};
use crate::chunks::iccp::{self, iCCPChunk};
use crate::chunks::itxt::{self, iTXtChunk};
use crate::chunks::phys::{self, pHYsChunk};
use crate::chunks::sbit::{self, sBITChunk};
use crate::chunks::splt::{self, sPLTChunk};
use crate::chunks::srgb::{self, sRGBChunk};
use crate::chunks::text::{self, tEXtChunk};
use crate::chunks::time::{self, tIMEChunk};
use crate::chunks::ztxt::{self, zTXtChunk};
use crate::chunks::ParseableChunk;
use crate::error::WarningKind;

/// A decoded ancillary chunk, one variant per known type.
#[allow(non_camel_case_types)]
#[derive(Debug, Clone, PartialEq)]
pub enum Metadata {
    bKGD(bKGDChunk),
    cHRM(cHRMChunk),
    eXIf(eXIfChunk),
    gAMA(gAMAChunk),
    hIST(hISTChunk),
    iCCP(iCCPChunk),
    iTXt(iTXtChunk),
    pHYs(pHYsChunk),
    sBIT(sBITChunk),
    sPLT(sPLTChunk),
    sRGB(sRGBChunk),
    tEXt(tEXtChunk),
    tIME(tIMEChunk),
    zTXt(zTXtChunk),
}

impl Metadata {
    /// The chunk type this record round-trips through.
    pub fn chunk_type(&self) -> [u8; 4] {
        match self {
            Metadata::bKGD(_) => *bKGDChunk::TYPE,
            Metadata::cHRM(_) => *cHRMChunk::TYPE,
            Metadata::eXIf(_) => *eXIfChunk::TYPE,
            Metadata::gAMA(_) => *gAMAChunk::TYPE,
            Metadata::hIST(_) => *hISTChunk::TYPE,
            Metadata::iCCP(_) => *iCCPChunk::TYPE,
            Metadata::iTXt(_) => *iTXtChunk::TYPE,
            Metadata::pHYs(_) => *pHYsChunk::TYPE,
            Metadata::sBIT(_) => *sBITChunk::TYPE,
            Metadata::sPLT(_) => *sPLTChunk::TYPE,
            Metadata::sRGB(_) => *sRGBChunk::TYPE,
            Metadata::tEXt(_) => *tEXtChunk::TYPE,
            Metadata::tIME(_) => *tIMEChunk::TYPE,
            Metadata::zTXt(_) => *zTXtChunk::TYPE,
        }
    }

    pub(crate) fn to_bytes(&self) -> Vec<u8> {
        match self {
            Metadata::bKGD(c) => c.to_bytes(),
            Metadata::cHRM(c) => c.to_bytes(),
            Metadata::eXIf(c) => c.to_bytes(),
            Metadata::gAMA(c) => c.to_bytes(),
            Metadata::hIST(c) => c.to_bytes(),
            Metadata::iCCP(c) => c.to_bytes(),
            Metadata::iTXt(c) => c.to_bytes(),
            Metadata::pHYs(c) => c.to_bytes(),
            Metadata::sBIT(c) => c.to_bytes(),
            Metadata::sPLT(c) => c.to_bytes(),
            Metadata::sRGB(c) => c.to_bytes(),
            Metadata::tEXt(c) => c.to_bytes(),
            Metadata::tIME(c) => c.to_bytes(),
            Metadata::zTXt(c) => c.to_bytes(),
        }
    }
}

pub(crate) type AncillaryDecoder = fn(&[u8]) -> Result<Metadata, WarningKind>;

/// Every ancillary chunk type the decoder understands, with its parser.
/// Selection happens by set membership; nothing is loaded at run time.
pub(crate) const KNOWN_ANCILLARY: [([u8; 4], AncillaryDecoder); 14] = [
    (*b"bKGD", bkgd::decode),
    (*b"cHRM", chrm::decode),
    (*b"eXIf", exif::decode),
    (*b"gAMA", gama::decode),
    (*b"hIST", hist::decode),
    (*b"iCCP", iccp::decode),
    (*b"iTXt", itxt::decode),
    (*b"pHYs", phys::decode),
    (*b"sBIT", sbit::decode),
    (*b"sPLT", splt::decode),
    (*b"sRGB", srgb::decode),
    (*b"tEXt", text::decode),
    (*b"tIME", time::decode),
    (*b"zTXt", ztxt::decode),
];

/// Chunk types that may legally appear more than once.
pub(crate) const REPEATABLE: [[u8; 4]; 4] = [*b"iTXt", *b"sPLT", *b"tEXt", *b"zTXt"];

pub(crate) fn decoder_for(ty: &[u8; 4]) -> Option<AncillaryDecoder> {
    KNOWN_ANCILLARY
        .iter()
        .find(|(known, _)| known == ty)
        .map(|(_, decoder)| *decoder)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn table_covers_the_known_types_once() {
        for (ty, _) in KNOWN_ANCILLARY {
            assert_eq!(
                KNOWN_ANCILLARY.iter().filter(|(t, _)| *t == ty).count(),
                1,
                "{} listed twice",
                String::from_utf8_lossy(&ty)
            );
        }
        assert!(decoder_for(b"gAMA").is_some());
        assert!(decoder_for(b"acTL").is_none());
    }

    #[test]
    fn dispatch_parses_a_gamma_record() {
        let decoder = decoder_for(b"gAMA").unwrap();
        let record = decoder(&45455u32.to_be_bytes()).unwrap();
        assert_eq!(record.chunk_type(), *b"gAMA");
        assert_eq!(record, Metadata::gAMA(gAMAChunk { gamma: 45455 }));
    }
}
