//! Linux virtual keyboard via `/dev/uinput`.
//!
//! # What is uinput? (for beginners)
//!
//! uinput is a kernel module that lets a user-space process create an input
//! device.  Everything written to the device afterwards is delivered to the
//! rest of the system (X11, Wayland compositors, the console) exactly like
//! input from real hardware: the receiving application cannot tell the
//! difference.
//!
//! Bringing a device up takes four steps, all on one file descriptor:
//!
//! 1. `open("/dev/uinput", O_WRONLY | O_NONBLOCK)`
//! 2. `UI_SET_EVBIT(EV_KEY)`, then `UI_SET_KEYBIT(code)` for every key the
//!    device may report.  Events for keys that were not enabled are dropped
//!    by the kernel.
//! 3. `write()` a `struct uinput_user_dev` with the device name and ids.
//! 4. `UI_DEV_CREATE`.
//!
//! From then on each `write()` of a `struct input_event` injects one event.
//! `UI_DEV_DESTROY` (issued on drop) unregisters the device.
//!
//! # Permissions
//!
//! Opening `/dev/uinput` normally needs root, or a udev rule granting the
//! user's group write access.  If the node is missing, load the module with
//! `modprobe uinput`.

use std::fs::{File, OpenOptions};
use std::io::Write;
use std::os::unix::fs::OpenOptionsExt;
use std::os::unix::io::AsRawFd;

use keytype_core::protocol::{EVENT_RECORD_SIZE, EV_KEY};
use keytype_core::{encode_event, KeyEvent};
use tracing::{debug, info, warn};

use crate::application::emit_events::{DeviceError, VirtualKeyboard};
use crate::infrastructure::config::DeviceConfig;

// ── uinput ABI ────────────────────────────────────────────────────────────────

mod ioctl {
    nix::ioctl_none!(ui_dev_create, b'U', 1);
    nix::ioctl_none!(ui_dev_destroy, b'U', 2);
    nix::ioctl_write_int!(ui_set_evbit, b'U', 100);
    nix::ioctl_write_int!(ui_set_keybit, b'U', 101);
}

const UINPUT_MAX_NAME_SIZE: usize = 80;
const ABS_CNT: usize = 64;
const BUS_USB: u16 = 0x03;

/// `struct input_id`.
#[repr(C)]
struct InputId {
    bustype: u16,
    vendor: u16,
    product: u16,
    version: u16,
}

/// `struct uinput_user_dev`, the legacy device descriptor.
///
/// The layout has no padding (80 + 8 + 4 bytes before the 4-aligned arrays),
/// so its bytes can be written as-is.
#[repr(C)]
struct UinputUserDev {
    name: [u8; UINPUT_MAX_NAME_SIZE],
    id: InputId,
    ff_effects_max: u32,
    absmax: [i32; ABS_CNT],
    absmin: [i32; ABS_CNT],
    absfuzz: [i32; ABS_CNT],
    absflat: [i32; ABS_CNT],
}

impl UinputUserDev {
    fn new(config: &DeviceConfig) -> Self {
        let mut name = [0u8; UINPUT_MAX_NAME_SIZE];
        // Keep the last byte as the NUL terminator.
        let len = config.name.len().min(UINPUT_MAX_NAME_SIZE - 1);
        name[..len].copy_from_slice(&config.name.as_bytes()[..len]);

        Self {
            name,
            id: InputId {
                bustype: BUS_USB,
                vendor: config.vendor,
                product: config.product,
                version: config.version,
            },
            ff_effects_max: 0,
            absmax: [0; ABS_CNT],
            absmin: [0; ABS_CNT],
            absfuzz: [0; ABS_CNT],
            absflat: [0; ABS_CNT],
        }
    }

    fn as_bytes(&self) -> &[u8] {
        // SAFETY: `UinputUserDev` is `repr(C)`, contains only integers and has
        // no padding, so every byte of it is initialised.
        unsafe {
            std::slice::from_raw_parts(
                (self as *const Self).cast::<u8>(),
                std::mem::size_of::<Self>(),
            )
        }
    }
}

/// Size of the `struct timeval` that prefixes every kernel event record.
const TIMEVAL_SIZE: usize = std::mem::size_of::<libc::timeval>();

/// Size of `struct input_event`.
const INPUT_EVENT_SIZE: usize = std::mem::size_of::<libc::input_event>();

const _: () = assert!(TIMEVAL_SIZE + EVENT_RECORD_SIZE == INPUT_EVENT_SIZE);

fn ioctl_result(
    request: &'static str,
    result: nix::Result<libc::c_int>,
) -> Result<(), DeviceError> {
    result.map(|_| ()).map_err(|errno| DeviceError::Ioctl {
        request,
        source: errno.into(),
    })
}

// ── Device ────────────────────────────────────────────────────────────────────

/// A registered uinput keyboard.
///
/// The device exists from [`UinputKeyboard::open`] until the value is dropped.
pub struct UinputKeyboard {
    file: File,
}

impl UinputKeyboard {
    /// Opens `/dev/uinput`, enables the configured keys and registers the device.
    ///
    /// # Errors
    ///
    /// Returns [`DeviceError::Open`] if the node cannot be opened and
    /// [`DeviceError::Ioctl`] / [`DeviceError::Write`] if any setup step is
    /// rejected.  Setup failures are fatal: no partially configured device is
    /// ever returned.
    pub fn open(config: &DeviceConfig) -> Result<Self, DeviceError> {
        let file = OpenOptions::new()
            .write(true)
            .custom_flags(libc::O_NONBLOCK)
            .open(&config.path)
            .map_err(|source| DeviceError::Open {
                path: config.path.clone(),
                source,
            })?;
        let fd = file.as_raw_fd();

        // SAFETY: `fd` is an open uinput descriptor for the duration of these calls.
        ioctl_result("UI_SET_EVBIT", unsafe {
            ioctl::ui_set_evbit(fd, libc::c_ulong::from(EV_KEY))
        })?;

        let keycodes = config.key_capabilities.keycodes();
        for &code in &keycodes {
            // SAFETY: as above.
            ioctl_result("UI_SET_KEYBIT", unsafe {
                ioctl::ui_set_keybit(fd, libc::c_ulong::from(code))
            })?;
        }
        debug!(count = keycodes.len(), capabilities = ?config.key_capabilities, "keys enabled");

        let descriptor = UinputUserDev::new(config);
        (&file)
            .write_all(descriptor.as_bytes())
            .map_err(DeviceError::Write)?;

        // SAFETY: as above.
        ioctl_result("UI_DEV_CREATE", unsafe { ioctl::ui_dev_create(fd) })?;

        info!(name = %config.name, path = %config.path.display(), "virtual keyboard created");
        Ok(Self { file })
    }
}

impl VirtualKeyboard for UinputKeyboard {
    fn emit(&self, event: KeyEvent) -> Result<(), DeviceError> {
        // The kernel stamps the time itself when the timeval is zero.
        let mut record = [0u8; INPUT_EVENT_SIZE];
        record[TIMEVAL_SIZE..].copy_from_slice(&encode_event(&event));

        let written = (&self.file).write(&record).map_err(DeviceError::Write)?;
        if written != record.len() {
            return Err(DeviceError::ShortWrite {
                written,
                expected: record.len(),
            });
        }
        Ok(())
    }
}

impl Drop for UinputKeyboard {
    fn drop(&mut self) {
        // SAFETY: `self.file` is still open; it is closed after this returns.
        let result = unsafe { ioctl::ui_dev_destroy(self.file.as_raw_fd()) };
        match ioctl_result("UI_DEV_DESTROY", result) {
            Ok(()) => info!("virtual keyboard destroyed"),
            Err(e) => warn!("could not destroy virtual keyboard: {e}"),
        }
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
