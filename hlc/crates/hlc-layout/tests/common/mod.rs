//! Shared helpers for layout integration tests

#![allow(dead_code)]

use hlc_layout::HeapLayoutConfig;

pub const MB: u64 = 1024 * 1024;
pub const GB: u64 = 1024 * MB;

/// Build a valid configuration from small random inputs
///
/// Card size ranges over 2^0..2^12, region size is 2^0..2^15 cards,
/// the heap holds 1..=4096 regions and alignment is 2^0..2^6.
pub fn valid_config(card_log: u8, cards_log: u8, regions: u16, align_log: u8) -> HeapLayoutConfig {
    let card = 1u64 << (card_log % 13);
    let region = card << (cards_log % 16);
    let heap = region * (u64::from(regions % 4096) + 1);
    let alignment = 1u64 << (align_log % 7);

    HeapLayoutConfig::default()
        .with_heap_size(heap)
        .with_region_size(region)
        .with_card_size(card)
        .with_object_alignment(alignment)
}

/// Build a valid configuration whose regions hold a whole number of
/// mark bitmap bytes
///
/// Alignment ranges over 2^0..2^6, region size is `alignment * 64`
/// times 2^0..2^9, the card size divides the region and the heap holds
/// 1..=4096 regions.
pub fn exact_config(align_log: u8, region_log: u8, card_log: u8, regions: u16) -> HeapLayoutConfig {
    let alignment = 1u64 << (align_log % 7);
    let region = (alignment * 64) << (region_log % 10);
    let card = 1u64 << (u32::from(card_log) % (region.trailing_zeros() + 1));
    let heap = region * (u64::from(regions % 4096) + 1);

    HeapLayoutConfig::default()
        .with_heap_size(heap)
        .with_region_size(region)
        .with_card_size(card)
        .with_object_alignment(alignment)
}

/// The two scenarios the calculator was first written for
pub fn reference_configs() -> [HeapLayoutConfig; 2] {
    [
        HeapLayoutConfig::new(8 * GB, 4 * MB),
        HeapLayoutConfig::new(2 * GB, MB),
    ]
}
