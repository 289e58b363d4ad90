use bitflags::bitflags;

bitflags! {
    /// Parser options, mirroring the `go/parser` mode bits that matter for
    /// recovery.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
    pub struct ParseMode: u8 {
        /// Collect comments into `SourceFile::comments`.
        const PARSE_COMMENTS = 1 << 0;
        /// Stop after the import declarations.
        const IMPORTS_ONLY = 1 << 1;
        /// Do not build the file-scope object table.
        const SKIP_OBJECT_RESOLUTION = 1 << 2;
        /// Report every error instead of the first per line (and at most 10).
        const ALL_ERRORS = 1 << 3;

        /// Package clause, imports and comments only.
        const HEADER = Self::ALL_ERRORS.bits()
            | Self::PARSE_COMMENTS.bits()
            | Self::IMPORTS_ONLY.bits()
            | Self::SKIP_OBJECT_RESOLUTION.bits();
        /// Whole file with comments.
        const FULL = Self::ALL_ERRORS.bits()
            | Self::PARSE_COMMENTS.bits()
            | Self::SKIP_OBJECT_RESOLUTION.bits();
    }
}
