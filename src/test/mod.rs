use crate::{
    expr::{Const, Expr, Width},
    memory::{Addr, BytesMemory, Memory, MemoryConfig, SparseMemory},
};

// Routes log output through the test harness; safe to call from every test
pub fn init_logging() {
    let _ = env_logger::builder().is_test(true).try_init();
}

// Byte memory holding `len` copies of `byte` at `begin`
pub fn filled_bytes(begin: Addr, len: usize, byte: u8) -> BytesMemory {
    BytesMemory::with_config([(begin, vec![byte; len])], MemoryConfig::strict())
        .expect("a single block cannot overlap")
}

// Sparse memory with every `[begin, end)` range filled with `byte`
pub fn filled_sparse(ranges: &[(Addr, Addr)], byte: u8) -> SparseMemory {
    let mut memory = SparseMemory::with_config(MemoryConfig::strict());
    for &(begin, end) in ranges {
        let width = Width::new((end - begin) as u32);
        let value = Const::new(&vec![byte; width.as_usize()], width);
        memory.store(begin, Expr::Const(value), width);
    }
    memory
}

// Little-endian bytes of a load, if it folds to a constant
pub fn folded_bytes<M: Memory + ?Sized>(memory: &M, addr: Addr, width: Width) -> Option<Vec<u8>> {
    let value = memory.load(addr, width)?.fold();
    value.as_const().map(|c| c.bytes().to_vec())
}

// Value of a load of at most 8 bytes, if it folds to a constant
pub fn folded_u64<M: Memory + ?Sized>(memory: &M, addr: Addr, width: Width) -> Option<u64> {
    memory.load(addr, width)?.fold().as_const()?.to_u64()
}
