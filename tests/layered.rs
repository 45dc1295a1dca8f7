//! Layered memory integration tests.
//!
//! These tests drive the memories through the public API the way an emulator
//! would:
//! 1. Load a program image into a bytes memory
//! 2. Put a sparse memory on top for writes
//! 3. Mix concrete and symbolic stores, then load across layer boundaries
//! 4. Flatten the stack and compare

use std::collections::HashMap;

use symmem::prelude::*;

/// Fold a load and return its bytes if it is concrete.
fn concrete(memory: &dyn Memory, addr: Addr, width: Width) -> Option<Vec<u8>> {
    let value = memory.load(addr, width)?.fold();
    value.as_const().map(|c| c.bytes().to_vec())
}

/// Two-segment program image: `.text` of `0xCC` and `.data` counting up.
fn image() -> Result<BytesMemory> {
    let data: Vec<u8> = (0u8..64).collect();
    BytesMemory::new([
        Block::new(0x1000, vec![0xCC; 0x100]),
        Block::new(0x2000, data),
    ])
}

#[test]
fn test_overlay_precedence_over_image() -> Result<()> {
    let base = BytesMemory::new([(1u64, vec![0x11u8; 63])])?;
    let mut overlay = SparseMemory::new();
    overlay.store(5, Expr::from_u64(0xFF, Width::W8), Width::W8);
    overlay.store(24, Expr::Const(Const::new(&[0xFF; 6], Width::new(6))), Width::new(6));

    let mut memory = OverlayMemory::new(base, overlay);
    assert_eq!(
        concrete(&memory, 4, Width::W32),
        Some(vec![0x11, 0xFF, 0x11, 0x11])
    );
    assert_eq!(memory.load(4, Width::W32).map(|e| e.width()), Some(Width::W32));

    // Stores through the overlay never reach the base
    memory.store(6, Expr::from_u64(0x22, Width::W8), Width::W8);
    assert_eq!(concrete(&memory, 5, Width::W16), Some(vec![0xFF, 0x22]));
    assert_eq!(concrete(memory.base(), 5, Width::W16), Some(vec![0x11, 0x11]));

    // Changing the base directly is visible to the next load
    memory.base_mut().store(7, Expr::from_u64(0x33, Width::W8), Width::W8);
    assert_eq!(concrete(&memory, 6, Width::W16), Some(vec![0x22, 0x33]));
    Ok(())
}

#[test]
fn test_symbolic_writes_over_image() -> Result<()> {
    let mut memory = OverlayMemory::new(image()?, SparseMemory::new());

    // Spill a symbolic register into .data, then patch one byte of it
    memory.store(0x2008, Expr::symbol("rdi", Width::W64), Width::W64);
    memory.store(0x200A, Expr::from_u64(0x00, Width::W8), Width::W8);

    let loaded = memory.load(0x2004, Width::W64).expect("range is mapped");
    assert_eq!(loaded.width(), Width::W64);
    assert_eq!(loaded.symbols().into_iter().collect::<Vec<_>>(), ["rdi"]);

    let bindings = HashMap::from([("rdi", Const::from_u64(0x8877_6655_4433_2211, Width::W64))]);
    let value = loaded.evaluate(&bindings).expect("all symbols bound");
    assert_eq!(value.bytes(), &[4, 5, 6, 7, 0x11, 0x22, 0x00, 0x44]);

    // Untouched bytes of the image stay concrete
    assert_eq!(concrete(&memory, 0x1000, Width::W32), Some(vec![0xCC; 4]));
    Ok(())
}

#[test]
fn test_missing_and_blocks_across_layers() -> Result<()> {
    let mut memory = OverlayMemory::new(image()?, SparseMemory::new());
    memory.store(0x1FFC, Expr::from_u64(0, Width::W64), Width::W64);
    memory.store(0x3000, Expr::from_u64(0, Width::W16), Width::W16);

    assert_eq!(
        memory.blocks(),
        IntervalMap::new([
            Interval::new(0x1000, 0x1100),
            Interval::new(0x1FFC, 0x2040),
            Interval::new(0x3000, 0x3002),
        ])
    );
    assert_eq!(
        memory.missing(0x10F0, Width::new(0x20)),
        IntervalMap::from(Interval::new(0x1100, 0x1110))
    );

    // A load over the gap fails as a whole
    assert_eq!(memory.load(0x10FC, Width::W64), None);
    // A load bridging the two layers succeeds
    assert_eq!(
        concrete(&memory, 0x1FFE, Width::W32),
        Some(vec![0, 0, 0, 0])
    );
    assert_eq!(concrete(&memory, 0x2004, Width::W16), Some(vec![4, 5]));
    Ok(())
}

#[test]
fn test_nested_stack_and_squash() -> Result<()> {
    let _ = env_logger::builder().is_test(true).try_init();

    let mut stack: Box<dyn Memory> = Box::new(image()?);
    for frame in 0..4u64 {
        let mut layer = SparseMemory::new();
        layer.store(0x2000 + frame * 4, Expr::from_u64(frame, Width::W32), Width::W32);
        stack = Box::new(OverlayMemory::from_boxed(stack, Box::new(layer)));
    }
    assert_eq!(stack.depth(), 5);

    let flat = squash(stack.as_ref())?;
    assert_eq!(flat.depth(), 1);
    assert_eq!(flat.blocks(), stack.blocks());
    for addr in (0x2000..0x2040).step_by(4) {
        assert_eq!(
            concrete(&flat, addr, Width::W32),
            concrete(stack.as_ref(), addr, Width::W32)
        );
    }
    assert_eq!(concrete(&flat, 0x2008, Width::W32), Some(vec![2, 0, 0, 0]));
    Ok(())
}

#[test]
fn test_address_spaces() -> Result<()> {
    let mut spaces = AddressSpaces::with_config(MemoryConfig::strict());
    spaces.insert("mem", OverlayMemory::new(image()?, SparseMemory::new()));

    spaces.store("mem", 0x1000, Expr::from_u64(0x90, Width::W8), Width::W8);
    spaces.store("stack", 0x7FF8, Expr::symbol("rbp", Width::W64), Width::W64);

    assert_eq!(
        spaces.load("mem", 0x1000, Width::W16).map(|e| e.fold()),
        Some(Expr::from_u64(0xCC90, Width::W16))
    );
    assert!(spaces.load("stack", 0x7FF8, Width::W64).is_some());
    assert_eq!(spaces.load("io", 0, Width::W8), None);
    assert_eq!(
        spaces.missing("io", 0, Width::W8),
        IntervalMap::from(Interval::new(0, 1))
    );
    assert_eq!(spaces.keys().collect::<Vec<_>>(), ["mem", "stack"]);
    Ok(())
}

#[test]
fn test_bytes_memory_rejects_bad_input() {
    let overlap = BytesMemory::new([(25u64, vec![0u8; 9]), (24, vec![0u8; 4])]);
    assert!(matches!(
        overlap,
        Err(Error::OverlappingBlocks { end: 28, begin: 25 })
    ));

    let mut memory = BytesMemory::new([(0u64, vec![0u8; 4])]).expect("valid image");
    let result = memory.try_store(0, &Expr::symbol("x", Width::W32), Width::W32);
    assert!(matches!(result, Err(Error::NotConstant(_))));
    assert_eq!(concrete(&memory, 0, Width::W32), Some(vec![0; 4]));
}
