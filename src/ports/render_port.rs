//! Render target port and the chart slots bound to it.
//!
//! The renderer owns live chart instances. A live chart only ever gets its
//! data replaced, its size changed, or is destroyed; anything else means
//! destroying it and creating a new one from a fresh [`ChartConfig`].

use crate::domain::chart::{ChartConfig, ChartData, CHART_HEIGHT};
use crate::domain::error::TradeplotError;
use crate::domain::presenter::Presentation;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum ChartSlot {
    Price,
    Equity,
}

impl ChartSlot {
    pub fn name(self) -> &'static str {
        match self {
            ChartSlot::Price => "price",
            ChartSlot::Equity => "equity",
        }
    }
}

pub trait RenderTarget {
    type Handle;

    fn create(
        &mut self,
        slot: ChartSlot,
        config: &ChartConfig,
    ) -> Result<Self::Handle, TradeplotError>;

    fn set_data(&mut self, handle: &Self::Handle, data: &ChartData) -> Result<(), TradeplotError>;

    fn set_size(
        &mut self,
        handle: &Self::Handle,
        width: u32,
        height: u32,
    ) -> Result<(), TradeplotError>;

    fn destroy(&mut self, handle: Self::Handle);
}

/// The two live charts, owned by whoever drives the renderer.
///
/// Rebinding always tears the previous chart down first, so repeated runs
/// never pile up render contexts.
#[derive(Debug)]
pub struct ChartSlots<H> {
    pub price: Option<H>,
    pub equity: Option<H>,
}

impl<H> Default for ChartSlots<H> {
    fn default() -> Self {
        ChartSlots {
            price: None,
            equity: None,
        }
    }
}

impl<H> ChartSlots<H> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, slot: ChartSlot) -> Option<&H> {
        match slot {
            ChartSlot::Price => self.price.as_ref(),
            ChartSlot::Equity => self.equity.as_ref(),
        }
    }

    pub fn live_count(&self) -> usize {
        usize::from(self.price.is_some()) + usize::from(self.equity.is_some())
    }

    /// Tear down both charts and bind the presentation's charts in their place.
    ///
    /// A slot whose chart the presentation lacks is left empty. If creating
    /// the equity chart fails, the freshly created price chart is destroyed too.
    pub fn apply<T>(self, presentation: &Presentation, target: &mut T) -> Result<Self, TradeplotError>
    where
        T: RenderTarget<Handle = H>,
    {
        self.clear(target);

        let price = match &presentation.price_chart {
            Some(chart) => Some(target.create(ChartSlot::Price, &chart.config)?),
            None => None,
        };
        let equity = match &presentation.equity_chart {
            Some(config) => match target.create(ChartSlot::Equity, config) {
                Ok(handle) => Some(handle),
                Err(e) => {
                    if let Some(handle) = price {
                        target.destroy(handle);
                    }
                    return Err(e);
                }
            },
            None => None,
        };

        Ok(ChartSlots { price, equity })
    }

    /// Destroy every live chart.
    pub fn clear<T>(self, target: &mut T)
    where
        T: RenderTarget<Handle = H>,
    {
        for handle in [self.price, self.equity].into_iter().flatten() {
            target.destroy(handle);
        }
    }

    /// Width follows the container; height stays fixed.
    pub fn resize<T>(&self, target: &mut T, width: u32) -> Result<(), TradeplotError>
    where
        T: RenderTarget<Handle = H>,
    {
        for handle in [&self.price, &self.equity].into_iter().flatten() {
            target.set_size(handle, width, CHART_HEIGHT)?;
        }
        Ok(())
    }

    /// Replace a live chart's full data matrix. `false` when the slot is empty.
    pub fn replace_data<T>(
        &self,
        slot: ChartSlot,
        data: &ChartData,
        target: &mut T,
    ) -> Result<bool, TradeplotError>
    where
        T: RenderTarget<Handle = H>,
    {
        match self.get(slot) {
            Some(handle) => {
                target.set_data(handle, data)?;
                Ok(true)
            }
            None => Ok(false),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::payload::{BacktestResult, EquitySample, PriceSample};
    use crate::domain::presenter::{present, PresentOptions};
    use std::collections::BTreeMap;

    #[derive(Default)]
    struct Recorder {
        next_id: u32,
        live: BTreeMap<u32, (ChartSlot, u32, u32)>,
        destroyed: Vec<u32>,
        data_updates: Vec<(u32, usize)>,
        fail_on: Option<ChartSlot>,
    }

    impl RenderTarget for Recorder {
        type Handle = u32;

        fn create(&mut self, slot: ChartSlot, config: &ChartConfig) -> Result<u32, TradeplotError> {
            if self.fail_on == Some(slot) {
                return Err(TradeplotError::render("canvas unavailable"));
            }
            self.next_id += 1;
            self.live
                .insert(self.next_id, (slot, config.width, config.height));
            Ok(self.next_id)
        }

        fn set_data(&mut self, handle: &u32, data: &ChartData) -> Result<(), TradeplotError> {
            self.data_updates.push((*handle, data.ys.len()));
            Ok(())
        }

        fn set_size(&mut self, handle: &u32, width: u32, height: u32) -> Result<(), TradeplotError> {
            if let Some(entry) = self.live.get_mut(handle) {
                entry.1 = width;
                entry.2 = height;
            }
            Ok(())
        }

        fn destroy(&mut self, handle: u32) {
            self.live.remove(&handle);
            self.destroyed.push(handle);
        }
    }

    fn result(with_price: bool) -> BacktestResult {
        BacktestResult {
            initial_cash: None,
            final_equity: 100.0,
            trades: Vec::new(),
            equity_curve: vec![EquitySample {
                time: 0,
                equity: 100.0,
            }],
            price_data: with_price.then(|| {
                vec![PriceSample {
                    time: 0,
                    price: 1.0,
                }]
            }),
        }
    }

    #[test]
    fn apply_binds_both_slots() {
        let mut target = Recorder::default();
        let p = present(&result(true), PresentOptions::default());
        let slots = ChartSlots::new().apply(&p, &mut target).unwrap();

        assert_eq!(slots.live_count(), 2);
        assert_eq!(target.live.len(), 2);
        assert_eq!(target.live[&slots.price.unwrap()].0, ChartSlot::Price);
    }

    #[test]
    fn rebinding_tears_down_previous_charts() {
        let mut target = Recorder::default();
        let p = present(&result(true), PresentOptions::default());

        let mut slots = ChartSlots::new();
        for _ in 0..5 {
            slots = slots.apply(&p, &mut target).unwrap();
        }

        assert_eq!(target.live.len(), 2);
        assert_eq!(target.destroyed.len(), 8);
    }

    #[test]
    fn missing_chart_leaves_slot_empty() {
        let mut target = Recorder::default();
        let slots = ChartSlots::new()
            .apply(&present(&result(true), PresentOptions::default()), &mut target)
            .unwrap();
        let slots = slots
            .apply(&present(&result(false), PresentOptions::default()), &mut target)
            .unwrap();

        assert!(slots.price.is_none());
        assert!(slots.equity.is_some());
        assert_eq!(target.live.len(), 1);
    }

    #[test]
    fn failed_create_releases_new_price_chart() {
        let mut target = Recorder {
            fail_on: Some(ChartSlot::Equity),
            ..Recorder::default()
        };
        let p = present(&result(true), PresentOptions::default());

        assert!(ChartSlots::new().apply(&p, &mut target).is_err());
        assert!(target.live.is_empty());
    }

    #[test]
    fn resize_changes_width_only() {
        let mut target = Recorder::default();
        let p = present(&result(true), PresentOptions { chart_width: 900 });
        let slots = ChartSlots::new().apply(&p, &mut target).unwrap();

        slots.resize(&mut target, 420).unwrap();

        for (_, width, height) in target.live.values() {
            assert_eq!(*width, 420);
            assert_eq!(*height, CHART_HEIGHT);
        }
        assert!(target.data_updates.is_empty());
    }

    #[test]
    fn replace_data_targets_live_slot() {
        let mut target = Recorder::default();
        let p = present(&result(false), PresentOptions::default());
        let slots = ChartSlots::new().apply(&p, &mut target).unwrap();
        let data = ChartData::default();

        assert!(!slots.replace_data(ChartSlot::Price, &data, &mut target).unwrap());
        assert!(slots.replace_data(ChartSlot::Equity, &data, &mut target).unwrap());
        assert_eq!(target.data_updates.len(), 1);
    }

    #[test]
    fn clear_destroys_everything() {
        let mut target = Recorder::default();
        let p = present(&result(true), PresentOptions::default());
        let slots = ChartSlots::new().apply(&p, &mut target).unwrap();
        slots.clear(&mut target);
        assert!(target.live.is_empty());
    }
}
