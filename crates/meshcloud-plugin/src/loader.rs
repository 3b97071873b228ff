//! GL entry point lookup for the context the host created.
//!
//! The host owns the GL context; the plugin only resolves function pointers
//! from the GL library the host already loaded.

use std::ffi::CString;
use std::rc::Rc;

use anyhow::Result;

use meshcloud_engine::backend::opengl::ProcLoader;

/// Builds the GL proc loader for this platform.
pub fn platform_loader() -> Result<ProcLoader> {
    let library = platform::GlLibrary::open()?;
    let loader: ProcLoader = Rc::new(move |name: &str| match CString::new(name) {
        Ok(name) => library.get(&name),
        Err(_) => std::ptr::null(),
    });
    Ok(loader)
}

#[cfg(windows)]
mod platform {
    use std::ffi::{CStr, c_void};

    use anyhow::{Context, Result};
    use windows::Win32::Foundation::HMODULE;
    use windows::Win32::Graphics::OpenGL::wglGetProcAddress;
    use windows::Win32::System::LibraryLoader::{GetModuleHandleA, GetProcAddress};
    use windows::core::{PCSTR, s};

    pub(super) struct GlLibrary {
        opengl32: HMODULE,
    }

    impl GlLibrary {
        pub(super) fn open() -> Result<Self> {
            let opengl32 = unsafe { GetModuleHandleA(s!("opengl32.dll")) }
                .context("opengl32.dll is not loaded in this process")?;
            Ok(Self { opengl32 })
        }

        pub(super) fn get(&self, name: &CStr) -> *const c_void {
            let name = PCSTR::from_raw(name.as_ptr().cast());
            // Extensions come from the ICD; GL 1.1 functions only from opengl32 itself.
            let proc = unsafe { wglGetProcAddress(name) };
            match proc.map(|f| f as usize) {
                // 1, 2, 3 and -1 are failure codes on some drivers.
                Some(addr) if !matches!(addr, 1 | 2 | 3 | usize::MAX) => addr as *const c_void,
                _ => unsafe { GetProcAddress(self.opengl32, name) }
                    .map_or(std::ptr::null(), |f| f as *const c_void),
            }
        }
    }
}

#[cfg(all(unix, not(target_os = "macos")))]
mod platform {
    use std::ffi::{CStr, c_void};

    use anyhow::{Result, bail};

    type GetProcAddress = unsafe extern "C" fn(name: *const libc::c_char) -> *const c_void;

    /// GLX first, then EGL; the host uses whichever it created the context with.
    const CANDIDATES: [(&CStr, &CStr); 3] = [
        (c"libGL.so.1", c"glXGetProcAddressARB"),
        (c"libGL.so", c"glXGetProcAddressARB"),
        (c"libEGL.so.1", c"eglGetProcAddress"),
    ];

    pub(super) struct GlLibrary {
        handle: *mut c_void,
        get_proc_address: Option<GetProcAddress>,
    }

    impl GlLibrary {
        pub(super) fn open() -> Result<Self> {
            for (library, resolver) in CANDIDATES {
                let handle = unsafe { libc::dlopen(library.as_ptr(), libc::RTLD_NOW | libc::RTLD_LOCAL) };
                if handle.is_null() {
                    continue;
                }
                let resolver = unsafe { libc::dlsym(handle, resolver.as_ptr()) };
                let get_proc_address = (!resolver.is_null()).then(|| {
                    // SAFETY: both resolvers have this signature.
                    unsafe { std::mem::transmute::<*mut c_void, GetProcAddress>(resolver) }
                });
                log::debug!("GL entry points resolved through {library:?}");
                return Ok(Self { handle, get_proc_address });
            }
            bail!("no GL library (libGL, libEGL) could be opened")
        }

        pub(super) fn get(&self, name: &CStr) -> *const c_void {
            let resolved = match self.get_proc_address {
                Some(resolve) => unsafe { resolve(name.as_ptr()) },
                None => std::ptr::null(),
            };
            if resolved.is_null() {
                unsafe { libc::dlsym(self.handle, name.as_ptr()) }.cast_const()
            } else {
                resolved
            }
        }
    }
}

#[cfg(target_os = "macos")]
mod platform {
    use std::ffi::{CStr, c_void};

    use anyhow::{Result, bail};

    const FRAMEWORK: &CStr = c"/System/Library/Frameworks/OpenGL.framework/OpenGL";

    pub(super) struct GlLibrary {
        handle: *mut c_void,
    }

    impl GlLibrary {
        pub(super) fn open() -> Result<Self> {
            let handle = unsafe { libc::dlopen(FRAMEWORK.as_ptr(), libc::RTLD_NOW | libc::RTLD_LOCAL) };
            if handle.is_null() {
                bail!("OpenGL.framework could not be opened");
            }
            Ok(Self { handle })
        }

        pub(super) fn get(&self, name: &CStr) -> *const c_void {
            unsafe { libc::dlsym(self.handle, name.as_ptr()) }.cast_const()
        }
    }
}
