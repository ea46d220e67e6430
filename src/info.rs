//! Static text shown by the command-line driver.

/// Banner printed on start-up.
pub const INTRO: &str = "\
Topological Amorphous Material Analysis
This program comes with ABSOLUTELY NO WARRANTY.
This is free software, and you are welcome to redistribute it under certain conditions.
To see the license conditions, run `tama --license`.
For help run `tama --help`.";

/// License notice printed by `--license`.
pub const LICENSE_NOTICE: &str = "\
This program is free software: you can redistribute it and/or modify
it under the terms of the GNU General Public License as published by
the Free Software Foundation, version 3.

This program is distributed in the hope that it will be useful,
but WITHOUT ANY WARRANTY; without even the implied warranty of
MERCHANTABILITY or FITNESS FOR A PARTICULAR PURPOSE.  See the
GNU General Public License for more details.

You should have received a copy of the GNU General Public License
along with this program.  If not, see <https://www.gnu.org/licenses/>.";
