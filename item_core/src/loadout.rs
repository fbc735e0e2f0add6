use crate::item::{Item, ItemStats};
use crate::types::ItemKind;
use crate::ItemError;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Equipment slot a fighter brings into battle
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EquipmentSlot {
    Weapon,
    Armor,
    Concoction,
}

impl EquipmentSlot {
    pub fn all() -> &'static [EquipmentSlot] {
        &[
            EquipmentSlot::Weapon,
            EquipmentSlot::Armor,
            EquipmentSlot::Concoction,
        ]
    }

    /// The only item kind that fits this slot
    pub fn accepts(&self) -> ItemKind {
        match self {
            EquipmentSlot::Weapon => ItemKind::Weapon,
            EquipmentSlot::Armor => ItemKind::Armor,
            EquipmentSlot::Concoction => ItemKind::Concoction,
        }
    }
}

impl fmt::Display for EquipmentSlot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EquipmentSlot::Weapon => write!(f, "Weapon"),
            EquipmentSlot::Armor => write!(f, "Armor"),
            EquipmentSlot::Concoction => write!(f, "Buff"),
        }
    }
}

/// The three equipment slots filled before a battle
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Loadout {
    weapon: Option<Item>,
    armor: Option<Item>,
    concoction: Option<Item>,
}

impl Loadout {
    pub fn new() -> Self {
        Loadout::default()
    }

    /// Put an item into a slot, returning whatever was there before
    ///
    /// `None` clears the slot.
    pub fn equip(
        &mut self,
        slot: EquipmentSlot,
        item: Option<Item>,
    ) -> Result<Option<Item>, ItemError> {
        if let Some(ref item) = item {
            if item.kind != slot.accepts() {
                return Err(ItemError::SlotMismatch {
                    slot,
                    kind: item.kind,
                });
            }
        }
        Ok(std::mem::replace(self.slot_mut(slot), item))
    }

    pub fn get(&self, slot: EquipmentSlot) -> Option<&Item> {
        match slot {
            EquipmentSlot::Weapon => self.weapon.as_ref(),
            EquipmentSlot::Armor => self.armor.as_ref(),
            EquipmentSlot::Concoction => self.concoction.as_ref(),
        }
    }

    /// Stat snapshot for the given slot
    pub fn stats(&self, slot: EquipmentSlot) -> Option<ItemStats> {
        self.get(slot).map(|item| item.stats.clone())
    }

    pub fn is_empty(&self) -> bool {
        self.weapon.is_none() && self.armor.is_none() && self.concoction.is_none()
    }

    fn slot_mut(&mut self, slot: EquipmentSlot) -> &mut Option<Item> {
        match slot {
            EquipmentSlot::Weapon => &mut self.weapon,
            EquipmentSlot::Armor => &mut self.armor,
            EquipmentSlot::Concoction => &mut self.concoction,
        }
    }
}
