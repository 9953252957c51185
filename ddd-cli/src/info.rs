use anyhow::Result;
use ddd_format::Generation;
use sha2::{Digest, Sha256};
use std::path::Path;
use tacho_ir::vu::Transfer;
use tacho_ir::{CardFile, StructuredFile, UnmarshalOptions, VehicleUnitFile};

use crate::{parse_input, read_input};

pub fn run_info(input: &Path, options: &UnmarshalOptions) -> Result<()> {
    let data = read_input(input)?;
    let file = parse_input(input, &data, options)?;

    println!("File:        {}", input.display());
    println!("Size:        {} bytes", data.len());
    println!("SHA-256:     {}", hex::encode(Sha256::digest(&data)));
    println!("Type:        {}", file.kind());

    match &file {
        StructuredFile::Card(card) => print_card(card),
        StructuredFile::RawCard(raw) => println!("Records:     {} (card type not recognised)", raw.records.len()),
        StructuredFile::VehicleUnit(vu) => print_vu(vu),
    }

    Ok(())
}

fn print_card(card: &CardFile) {
    println!("Card type:   {:?}", card.card_type);
    for generation in [Generation::Gen1, Generation::Gen2] {
        let Some(df) = card.df(generation) else {
            continue;
        };
        let populated = df.populated();
        let invalid = df.invalid();
        println!("{generation:?} files:  {}", populated.len());
        if !invalid.is_empty() {
            println!("  undecoded: {invalid:?}");
        }
    }
    if !card.proprietary_efs.is_empty() {
        let fids: Vec<String> = card.proprietary_efs.iter().map(|p| format!("{:04X}", p.fid)).collect();
        println!("Proprietary: {}", fids.join(", "));
    }
}

fn print_vu(vu: &VehicleUnitFile) {
    if let Some(generation) = vu.generation() {
        println!("Generation:  {generation:?}");
    }
    println!("Transfers:   {}", vu.transfers.len());
    for transfer in &vu.transfers {
        match transfer {
            Transfer::Data { transfer_type, .. } => println!("  {transfer_type:?}"),
            Transfer::Raw(raw) => println!("  raw ({} bytes)", raw.len()),
        }
    }
}
