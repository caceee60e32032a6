// Copyright 2025 eraflo
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

// Monos Sandbox
// Main binary for walking a handle through its lifecycle with the
// tracking allocator registered.

use anyhow::Result;
use log::info;
use monos_alloc::TrackingAllocator;
use monos_core::memory;
use monos_core::UniqueHandle;

#[global_allocator]
static GLOBAL: TrackingAllocator = TrackingAllocator::new(std::alloc::System);

/// A stand-in resource with a payload big enough to show up in the byte
/// counters.
#[derive(Debug)]
struct Probe {
    id: u32,
    payload: Vec<u8>,
}

impl Probe {
    fn new(id: u32, payload_bytes: usize) -> Box<Self> {
        Box::new(Self {
            id,
            payload: vec![0; payload_bytes],
        })
    }
}

fn main() -> Result<()> {
    env_logger::init();

    info!("acquiring probe 1");
    let mut first = UniqueHandle::from_boxed(Probe::new(1, 256 * 1024));
    if let Some(probe) = first.get() {
        info!(
            "probe {} acquired with {} payload bytes",
            probe.id,
            probe.payload.len()
        );
    }

    info!("transferring ownership out of the first handle");
    let second = first.take();
    info!(
        "source handle is now {:?}, destination is {:?}",
        first, second
    );

    {
        let scoped = UniqueHandle::from_boxed(Probe::new(2, 64 * 1024));
        info!(
            "probe {:?} is scoped to this block and releases on exit",
            scoped.get().map(|p| p.id)
        );
    }
    info!(
        "after the block, {} value(s) remain owned",
        memory::get_live_owned_values()
    );

    drop(second);

    let ownership = memory::get_ownership_stats();
    let heap = memory::get_memory_stats();
    info!(
        "ownership stats: {}",
        serde_json::to_string_pretty(&ownership)?
    );
    info!("heap stats: {}", serde_json::to_string_pretty(&heap)?);

    Ok(())
}
