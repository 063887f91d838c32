// Copyright 2023 Datafuse Labs.
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

/// Options for parsing field selector strings.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct JsonParseOptions {
    apply_url_decoding: bool,
}

impl JsonParseOptions {
    pub fn builder() -> JsonParseOptionsBuilder {
        JsonParseOptionsBuilder::default()
    }

    /// Whether the input is URL-decoded (`%XX` and `+`) before parsing.
    pub fn is_apply_url_decoding(&self) -> bool {
        self.apply_url_decoding
    }
}

#[derive(Debug, Clone, Default)]
pub struct JsonParseOptionsBuilder {
    apply_url_decoding: bool,
}

impl JsonParseOptionsBuilder {
    pub fn with_url_decoding(mut self, apply_url_decoding: bool) -> Self {
        self.apply_url_decoding = apply_url_decoding;
        self
    }

    pub fn build(self) -> JsonParseOptions {
        JsonParseOptions {
            apply_url_decoding: self.apply_url_decoding,
        }
    }
}
