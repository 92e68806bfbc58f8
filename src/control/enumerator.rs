//! Index-driven control enumeration.
//!
//! `enumerate(device, i)` returns `None` once `i` runs past the device's
//! control table. Nothing is cached: a new [`Controls`] iterator queries the
//! device again from index 0, so a disable/enable cycle that changes the
//! control set is always reflected.

use std::iter::FusedIterator;

use tracing::trace;

use super::{ControlDescriptor, ControlKind, ControlType, RawControl};
use crate::device::DeviceOperations;

/// Describe the control at `index`, or `None` past the end of the table.
pub fn enumerate<D>(device: &D, index: usize) -> Option<ControlDescriptor>
where
    D: DeviceOperations + ?Sized,
{
    let raw = device.control_at(index)?;
    Some(classify(device, index, raw))
}

/// Lazily walk every control the device currently exposes.
pub fn controls<D>(device: &D) -> Controls<'_, D>
where
    D: DeviceOperations + ?Sized,
{
    Controls {
        device,
        next: 0,
        done: false,
    }
}

/// Iterator returned by [`controls`].
pub struct Controls<'a, D: ?Sized> {
    device: &'a D,
    next: usize,
    done: bool,
}

impl<D> Iterator for Controls<'_, D>
where
    D: DeviceOperations + ?Sized,
{
    type Item = ControlDescriptor;

    fn next(&mut self) -> Option<Self::Item> {
        if self.done {
            return None;
        }
        match enumerate(self.device, self.next) {
            Some(desc) => {
                self.next += 1;
                Some(desc)
            }
            None => {
                trace!(count = self.next, "control enumeration finished");
                self.done = true;
                None
            }
        }
    }
}

impl<D> FusedIterator for Controls<'_, D> where D: DeviceOperations + ?Sized {}

fn classify<D>(device: &D, index: usize, raw: RawControl) -> ControlDescriptor
where
    D: DeviceOperations + ?Sized,
{
    let kind = match raw.typ {
        ControlType::Boolean => ControlKind::Boolean {
            default: raw.default != 0,
        },
        ControlType::Integer | ControlType::Integer64 => ControlKind::Integer {
            min: raw.minimum,
            max: raw.maximum,
            default: raw.default,
            step: raw.step,
        },
        ControlType::Menu | ControlType::IntegerMenu => ControlKind::Menu {
            default: raw.default,
            options: device.menu(index),
        },
        ControlType::Button => ControlKind::Button,
        ControlType::Other(typ) => ControlKind::Unsupported { typ },
    };
    trace!(index, name = %raw.name, group = %raw.group, ?kind, "enumerated control");

    ControlDescriptor {
        index,
        name: raw.name,
        group: raw.group,
        kind,
    }
}
