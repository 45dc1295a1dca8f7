#![no_main]

use libfuzzer_sys::fuzz_target;
use symmem::prelude::*;

const SPACE: usize = 256;

type Model = [Option<u8>; SPACE];

fn expected(model: &Model, addr: usize, len: usize) -> Option<Vec<u8>> {
    if len == 0 {
        return None;
    }
    model[addr..addr + len].iter().copied().collect()
}

fn loaded(memory: &dyn Memory, addr: usize, width: Width) -> Option<Vec<u8>> {
    let value = memory.load(addr as u64, width)?.fold();
    value.as_const().map(|c| c.bytes().to_vec())
}

// Replays stores and loads decoded from the input on a sparse memory and on an
// overlay of two sparse memories, checking both against byte arrays.
fuzz_target!(|data: &[u8]| {
    let strict = MemoryConfig::strict();
    let mut sparse = SparseMemory::with_config(strict);
    let mut overlay = OverlayMemory::with_config(
        SparseMemory::with_config(strict),
        SparseMemory::with_config(strict),
        strict,
    );
    let mut latest: Model = [None; SPACE];
    let mut below: Model = [None; SPACE];
    let mut above: Model = [None; SPACE];

    let mut input = data;
    while let [op, addr, len, rest @ ..] = input {
        let addr = usize::from(*addr);
        let len = usize::from(*len % 9).min(SPACE - addr);
        let width = Width::new(len as u32);

        match op % 3 {
            0 | 1 if rest.len() >= len => {
                let bytes = &rest[..len];
                let value = Expr::Const(Const::new(bytes, width));
                sparse.store(addr as u64, value.clone(), width);

                let layer = if op % 3 == 0 {
                    overlay.store(addr as u64, value, width);
                    &mut above
                } else {
                    overlay.base_mut().store(addr as u64, value, width);
                    &mut below
                };
                for (i, &b) in bytes.iter().enumerate() {
                    latest[addr + i] = Some(b);
                    layer[addr + i] = Some(b);
                }
                input = &rest[len..];
            }
            _ => {
                let layered: Model = std::array::from_fn(|i| above[i].or(below[i]));
                assert_eq!(loaded(&sparse, addr, width), expected(&latest, addr, len));
                assert_eq!(loaded(&overlay, addr, width), expected(&layered, addr, len));
                input = rest;
            }
        }
    }

    assert_eq!(sparse.blocks(), overlay.blocks());
});
