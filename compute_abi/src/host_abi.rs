//! Raw host imports.
//!
//! Every function returns a host status code; results are written through the
//! `*_out` pointers. Only linked when running as a wasm guest.

pub mod fastly_object_store {
    #[link(wasm_import_module = "fastly_object_store")]
    extern "C" {
        #[link_name = "open"]
        pub fn open(name_ptr: *const u8, name_len: usize, kv_store_handle_out: *mut u32) -> u32;

        #[link_name = "lookup"]
        pub fn lookup(
            kv_store_handle: u32,
            key_ptr: *const u8,
            key_len: usize,
            body_handle_out: *mut u32,
        ) -> u32;

        #[link_name = "insert"]
        pub fn insert(
            kv_store_handle: u32,
            key_ptr: *const u8,
            key_len: usize,
            body_handle: u32,
        ) -> u32;

        #[link_name = "delete"]
        pub fn delete(kv_store_handle: u32, key_ptr: *const u8, key_len: usize) -> u32;
    }
}

pub mod fastly_config_store {
    #[link(wasm_import_module = "fastly_config_store")]
    extern "C" {
        #[link_name = "open"]
        pub fn open(name_ptr: *const u8, name_len: usize, config_store_handle_out: *mut u32)
            -> u32;

        #[link_name = "get"]
        pub fn get(
            config_store_handle: u32,
            key_ptr: *const u8,
            key_len: usize,
            value_ptr: *mut u8,
            value_max_len: usize,
            nwritten_out: *mut usize,
        ) -> u32;
    }
}

pub mod fastly_http_body {
    #[link(wasm_import_module = "fastly_http_body")]
    extern "C" {
        #[link_name = "new"]
        pub fn new(body_handle_out: *mut u32) -> u32;

        #[link_name = "read"]
        pub fn read(body_handle: u32, buf_ptr: *mut u8, buf_len: usize, nread_out: *mut usize)
            -> u32;

        #[link_name = "write"]
        pub fn write(
            body_handle: u32,
            buf_ptr: *const u8,
            buf_len: usize,
            end: u32,
            nwritten_out: *mut usize,
        ) -> u32;

        #[link_name = "close"]
        pub fn close(body_handle: u32) -> u32;
    }
}
