//! Memory operand sizes and their textual forms.

/// Static description of one [`MemorySize`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MemorySizeInfo {
    /// Size in bytes (element size for broadcast sizes, 0 if unsized).
    pub size: usize,
    /// NASM size keyword written before `[`.
    pub keyword: Option<&'static str>,
    /// Broadcast decorator body (`1to16`) for broadcast sizes.
    pub bcst_to: Option<&'static str>,
}

macro_rules! memory_sizes {
    ($( $(#[$meta:meta])* $variant:ident => ($size:expr, $keyword:expr, $bcst:expr) ),* $(,)?) => {
        /// Size and shape of the memory an operand reads or writes.
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
        #[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
        #[allow(non_camel_case_types)]
        pub enum MemorySize {
            #[default]
            $( $(#[$meta])* $variant, )*
        }

        const INFOS: &[MemorySizeInfo] = &[$(
            MemorySizeInfo { size: $size, keyword: $keyword, bcst_to: $bcst },
        )*];
    };
}

memory_sizes! {
    /// No size (`lea`, `nop` hint forms).
    Unknown => (0, None, None),
    UInt8 => (1, Some("byte"), None),
    UInt16 => (2, Some("word"), None),
    UInt32 => (4, Some("dword"), None),
    UInt64 => (8, Some("qword"), None),
    UInt128 => (16, Some("oword"), None),
    UInt256 => (32, Some("yword"), None),
    UInt512 => (64, Some("zword"), None),
    Int16 => (2, Some("word"), None),
    Int32 => (4, Some("dword"), None),
    Int64 => (8, Some("qword"), None),
    Float32 => (4, Some("dword"), None),
    Float64 => (8, Some("qword"), None),
    Float80 => (10, Some("tword"), None),
    /// Packed BCD (`fbld`).
    Bcd => (10, Some("tword"), None),
    Packed64 => (8, Some("qword"), None),
    Packed128 => (16, Some("oword"), None),
    Packed256 => (32, Some("yword"), None),
    Packed512 => (64, Some("zword"), None),
    /// `bound` pair of words.
    Bound16_WordWord => (4, Some("dword"), None),
    /// `bound` pair of dwords.
    Bound32_DwordDword => (8, Some("qword"), None),
    FpuEnv14 => (14, None, None),
    FpuEnv28 => (28, None, None),
    FpuState94 => (94, None, None),
    FpuState108 => (108, None, None),
    Fxsave_512Byte => (512, None, None),
    Fxsave64_512Byte => (512, None, None),
    /// Variable-sized `xsave` area.
    Xsave => (0, None, None),
    Xsave64 => (0, None, None),
    /// Far pointer `16:16`.
    SegPtr16 => (4, Some("far"), None),
    /// Far pointer `16:32`.
    SegPtr32 => (6, Some("far"), None),
    /// Far pointer `16:64`.
    SegPtr64 => (10, Some("far"), None),
    /// `lgdt`-style 16-bit limit and 32-bit base.
    Fword6 => (6, None, None),
    /// `lgdt`-style 16-bit limit and 64-bit base.
    Fword10 => (10, None, None),
    Broadcast128_Float32 => (4, Some("dword"), Some("1to4")),
    Broadcast256_Float32 => (4, Some("dword"), Some("1to8")),
    Broadcast512_Float32 => (4, Some("dword"), Some("1to16")),
    Broadcast128_Float64 => (8, Some("qword"), Some("1to2")),
    Broadcast256_Float64 => (8, Some("qword"), Some("1to4")),
    Broadcast512_Float64 => (8, Some("qword"), Some("1to8")),
    Broadcast128_UInt32 => (4, Some("dword"), Some("1to4")),
    Broadcast256_UInt32 => (4, Some("dword"), Some("1to8")),
    Broadcast512_UInt32 => (4, Some("dword"), Some("1to16")),
    Broadcast128_UInt64 => (8, Some("qword"), Some("1to2")),
    Broadcast256_UInt64 => (8, Some("qword"), Some("1to4")),
    Broadcast512_UInt64 => (8, Some("qword"), Some("1to8")),
}

impl MemorySize {
    /// Static size, keyword and broadcast info.
    pub fn info(self) -> &'static MemorySizeInfo {
        &INFOS[self as usize]
    }

    /// Size in bytes (element size for broadcasts).
    pub fn size(self) -> usize {
        self.info().size
    }

    /// Whether this is a `{1toN}` broadcast size.
    pub fn is_broadcast(self) -> bool {
        self.info().bcst_to.is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn keywords() {
        assert_eq!(MemorySize::UInt8.info().keyword, Some("byte"));
        assert_eq!(MemorySize::Packed256.info().keyword, Some("yword"));
        assert_eq!(MemorySize::Float80.info().keyword, Some("tword"));
        assert_eq!(MemorySize::Unknown.info().keyword, None);
    }

    #[test]
    fn broadcast_sizes_use_element_size() {
        let info = MemorySize::Broadcast512_Float32.info();
        assert_eq!(info.size, 4);
        assert_eq!(info.bcst_to, Some("1to16"));
        assert!(MemorySize::Broadcast128_UInt64.is_broadcast());
        assert!(!MemorySize::Packed128.is_broadcast());
    }

    #[test]
    fn default_is_unknown() {
        assert_eq!(MemorySize::default(), MemorySize::Unknown);
        assert_eq!(MemorySize::default().size(), 0);
    }
}
