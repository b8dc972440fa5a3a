#![no_main]
use libfuzzer_sys::fuzz_target;
use megalo::{Definition, ParameterKind, ScriptDatabase};

fn database() -> ScriptDatabase {
    let mut db = ScriptDatabase::new();
    for opcode in 1..8 {
        db.conditions.insert(Definition::new(opcode, vec![ParameterKind::Integer; opcode as usize % 3]));
        db.actions.insert(Definition::new(opcode, vec![ParameterKind::Float, ParameterKind::Integer]));
    }
    db
}

fuzz_target!(|data: &[u8]| {
    let db = database();
    if let Ok(decoded) = megalo::decode(data, &db) {
        // Überlappende Pool-Einträge passen nach dem Neukodieren evtl. nicht mehr in die Offsets
        if let Ok(bytes) = megalo::encode(&decoded, &db) {
            let again = megalo::decode(&bytes, &db).expect("re-encoded block must decode");
            // NaN-sicher: Bytes statt Werte vergleichen
            assert_eq!(megalo::encode(&again, &db).expect("stable encode"), bytes);
        }
    }
});
